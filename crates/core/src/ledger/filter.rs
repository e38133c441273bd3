//! Expense filtering.

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::types::Expense;

/// Conjunctive filter over expenses.
///
/// Every bound that is set must hold; an empty filter matches everything.
/// Date bounds are inclusive. Category matching ignores case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseFilter {
    /// Earliest transaction date to include.
    pub start_date: Option<NaiveDate>,
    /// Latest transaction date to include.
    pub end_date: Option<NaiveDate>,
    /// Category to match, case-insensitively.
    pub category: Option<String>,
}

impl ExpenseFilter {
    /// A filter matching every expense.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter on an inclusive date range.
    #[must_use]
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start_date: Some(start),
            end_date: Some(end),
            category: None,
        }
    }

    /// Adds a lower date bound.
    #[must_use]
    pub fn since(mut self, start: NaiveDate) -> Self {
        self.start_date = Some(start);
        self
    }

    /// Adds an upper date bound.
    #[must_use]
    pub fn until(mut self, end: NaiveDate) -> Self {
        self.end_date = Some(end);
        self
    }

    /// Adds a category bound.
    #[must_use]
    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Returns true if no bound is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none() && self.category.is_none()
    }

    /// Returns true if `expense` satisfies every set bound.
    #[must_use]
    pub fn matches(&self, expense: &Expense) -> bool {
        if self.start_date.is_some_and(|start| expense.date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| expense.date > end) {
            return false;
        }
        match &self.category {
            Some(category) => expense.category.to_lowercase() == category.to_lowercase(),
            None => true,
        }
    }

    /// Keeps the matching expenses, preserving order.
    #[must_use]
    pub fn apply(&self, expenses: Vec<Expense>) -> Vec<Expense> {
        if self.is_empty() {
            return expenses;
        }
        expenses.into_iter().filter(|e| self.matches(e)).collect()
    }
}

/// Dashboard date-range presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterWindow {
    /// From the first of the current month through today.
    ThisMonth,
    /// The seven days before today, through today.
    Last7Days,
    /// The trailing year through today.
    All,
    /// An explicit inclusive range.
    Custom {
        /// First day.
        start: NaiveDate,
        /// Last day.
        end: NaiveDate,
    },
}

impl FilterWindow {
    /// Resolves the preset into a date filter relative to `today`.
    #[must_use]
    pub fn to_filter(self, today: NaiveDate) -> ExpenseFilter {
        let (start, end) = match self {
            Self::ThisMonth => (today.with_day(1).unwrap_or(today), today),
            Self::Last7Days => (today - Duration::days(7), today),
            Self::All => (
                today.checked_sub_months(Months::new(12)).unwrap_or(NaiveDate::MIN),
                today,
            ),
            Self::Custom { start, end } => (start, end),
        };
        ExpenseFilter::between(start, end)
    }

    /// Parses a preset name (`this-month`, `last-7-days`, `all`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "this-month" | "this_month" | "month" => Some(Self::ThisMonth),
            "last-7-days" | "last_7_days" | "week" => Some(Self::Last7Days),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}
