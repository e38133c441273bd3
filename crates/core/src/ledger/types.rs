//! Ledger domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{CurrencyCode, ExpenseId};

use crate::currency::Convertible;

/// A persisted expense record.
///
/// `converted_amount` is the canonical-currency value computed when `amount`
/// or `currency` was last written. Listings may refresh it in the returned
/// copies but never write the refreshed value back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Immutable identifier assigned at creation.
    pub id: ExpenseId,
    /// Free-text label, used as the aggregation key.
    pub category: String,
    /// Amount in `currency`. Negative values are allowed.
    pub amount: Decimal,
    /// Currency the amount was entered in.
    pub currency: CurrencyCode,
    /// Amount in the canonical currency.
    pub converted_amount: Decimal,
    /// Transaction date.
    pub date: NaiveDate,
    /// Optional merchant name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
    /// Optional receipt (URL or encoded image), carried opaquely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt: Option<String>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last changed.
    pub updated_at: DateTime<Utc>,
}

impl Convertible for Expense {
    fn amount(&self) -> Decimal {
        self.amount
    }

    fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    fn set_converted_amount(&mut self, converted: Decimal) {
        self.converted_amount = converted;
    }
}

/// Fields supplied when recording a new expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    /// Category label.
    pub category: String,
    /// Amount in `currency`.
    pub amount: Decimal,
    /// Currency of `amount`.
    pub currency: CurrencyCode,
    /// Transaction date.
    pub date: NaiveDate,
    /// Optional merchant name.
    #[serde(default)]
    pub merchant: Option<String>,
    /// Optional receipt.
    #[serde(default)]
    pub receipt: Option<String>,
}

impl NewExpense {
    /// Creates a payload without merchant or receipt.
    #[must_use]
    pub fn new(
        category: impl Into<String>,
        amount: Decimal,
        currency: impl Into<CurrencyCode>,
        date: NaiveDate,
    ) -> Self {
        Self {
            category: category.into(),
            amount,
            currency: currency.into(),
            date,
            merchant: None,
            receipt: None,
        }
    }

    /// Sets the merchant.
    #[must_use]
    pub fn with_merchant(mut self, merchant: impl Into<String>) -> Self {
        self.merchant = Some(merchant.into());
        self
    }

    /// Sets the receipt.
    #[must_use]
    pub fn with_receipt(mut self, receipt: impl Into<String>) -> Self {
        self.receipt = Some(receipt.into());
        self
    }
}

/// Partial update; `None` fields are left unchanged.
///
/// `merchant` and `receipt` are optional on the record itself, so their
/// updates are two-level: `Some(None)` clears the field, which a JSON
/// `null` also expresses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseUpdate {
    /// New category.
    pub category: Option<String>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New currency.
    pub currency: Option<CurrencyCode>,
    /// New transaction date.
    pub date: Option<NaiveDate>,
    /// New merchant, or `Some(None)` to clear it.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub merchant: Option<Option<String>>,
    /// New receipt, or `Some(None)` to clear it.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub receipt: Option<Option<String>>,
}

impl ExpenseUpdate {
    /// Returns true if the update touches `amount` or `currency`.
    #[must_use]
    pub fn changes_money(&self) -> bool {
        self.amount.is_some() || self.currency.is_some()
    }

    /// Merges the provided fields onto `expense`.
    ///
    /// Does not touch `converted_amount` or the timestamps.
    pub fn apply_to(self, expense: &mut Expense) {
        if let Some(category) = self.category {
            expense.category = category;
        }
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(currency) = self.currency {
            expense.currency = currency;
        }
        if let Some(date) = self.date {
            expense.date = date;
        }
        if let Some(merchant) = self.merchant {
            expense.merchant = merchant;
        }
        if let Some(receipt) = self.receipt {
            expense.receipt = receipt;
        }
    }
}

/// Running total for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// Category label, exactly as first encountered.
    pub category: String,
    /// Sum of converted amounts.
    pub amount: Decimal,
}

/// Aggregate view over a set of expenses, in the canonical currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSummary {
    /// Sum of every converted amount.
    pub total_expenses: Decimal,
    /// Always zero: there is no separate income ledger.
    pub total_income: Decimal,
    /// `total_income - total_expenses`.
    pub balance: Decimal,
    /// Per-category totals in first-encounter order.
    pub by_category: Vec<CategoryTotal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn expense() -> Expense {
        let now = Utc::now();
        Expense {
            id: ExpenseId::new(),
            category: "Groceries".to_string(),
            amount: dec!(100),
            currency: "USD".into(),
            converted_amount: dec!(100),
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            merchant: None,
            receipt: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_serialized_field_names() {
        let value = serde_json::to_value(expense()).unwrap();
        assert!(value.get("convertedAmount").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert_eq!(value["date"], "2024-01-05");
        // Decimals are stored as strings to keep precision.
        assert_eq!(value["amount"], "100");
        assert!(value.get("merchant").is_none());
    }

    #[test]
    fn test_round_trip_restores_typed_dates() {
        let original = expense();
        let json = serde_json::to_string(&original).unwrap();
        let restored: Expense = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_update_merges_only_provided_fields() {
        let mut record = expense();
        let update = ExpenseUpdate {
            merchant: Some(Some("Corner Shop".to_string())),
            ..ExpenseUpdate::default()
        };
        assert!(!update.changes_money());

        update.apply_to(&mut record);
        assert_eq!(record.merchant.as_deref(), Some("Corner Shop"));
        assert_eq!(record.category, "Groceries");
        assert_eq!(record.amount, dec!(100));
    }

    #[test]
    fn test_update_detects_money_changes() {
        let amount_only = ExpenseUpdate {
            amount: Some(dec!(0)),
            ..ExpenseUpdate::default()
        };
        assert!(amount_only.changes_money());

        let currency_only = ExpenseUpdate {
            currency: Some("EUR".into()),
            ..ExpenseUpdate::default()
        };
        assert!(currency_only.changes_money());
    }

    #[test]
    fn test_update_can_clear_optional_fields() {
        let mut record = expense();
        record.merchant = Some("Corner Shop".to_string());
        record.receipt = Some("r-42".to_string());

        let update: ExpenseUpdate = serde_json::from_str(r#"{"merchant": null}"#).unwrap();
        assert_eq!(update.merchant, Some(None));
        assert_eq!(update.receipt, None);

        update.apply_to(&mut record);
        assert_eq!(record.merchant, None);
        assert_eq!(record.receipt.as_deref(), Some("r-42"));
    }
}
