//! Property-based tests for the ledger store.
//!
//! - Filter bounds combine conjunctively
//! - Pages partition the filtered listing and agree on the total
//! - Category totals add up to the expense total

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::{ExpenseId, PageRequest};

use super::filter::ExpenseFilter;
use super::service::LedgerStore;
use super::summary::summarize;
use super::types::{Expense, NewExpense};
use crate::currency::{Converter, MockRateProvider};
use crate::storage::OpenDalStore;

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Strategy for dates within a year of the epoch.
fn day() -> impl Strategy<Value = NaiveDate> {
    (0i64..366).prop_map(|offset| epoch() + Duration::days(offset))
}

/// Strategy for categories with mixed case.
fn category() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["Food", "food", "Rent", "RENT", "Travel"]).prop_map(str::to_string)
}

/// Strategy for signed canonical amounts.
fn amount() -> impl Strategy<Value = Decimal> {
    (-1_000_000i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn expense(category: String, amount: Decimal, date: NaiveDate) -> Expense {
    let now = Utc::now();
    Expense {
        id: ExpenseId::new(),
        category,
        amount,
        currency: "USD".into(),
        converted_amount: amount,
        date,
        merchant: None,
        receipt: None,
        created_at: now,
        updated_at: now,
    }
}

fn expenses() -> impl Strategy<Value = Vec<Expense>> {
    prop::collection::vec((category(), amount(), day()), 0..30)
        .prop_map(|rows| rows.into_iter().map(|(c, a, d)| expense(c, a, d)).collect())
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime")
        .block_on(future)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A record passes the filter exactly when it passes every bound alone.
    #[test]
    fn prop_filter_is_conjunctive(
        items in expenses(),
        start in prop::option::of(day()),
        end in prop::option::of(day()),
        cat in prop::option::of(category()),
    ) {
        let combined = ExpenseFilter { start_date: start, end_date: end, category: cat.clone() };
        let parts = [
            ExpenseFilter { start_date: start, ..ExpenseFilter::default() },
            ExpenseFilter { end_date: end, ..ExpenseFilter::default() },
            ExpenseFilter { category: cat, ..ExpenseFilter::default() },
        ];
        for item in &items {
            let expected = parts.iter().all(|p| p.matches(item));
            prop_assert_eq!(combined.matches(item), expected);
        }
    }

    /// Category sums equal the total, and balance is its negation.
    #[test]
    fn prop_summary_categories_sum_to_total(items in expenses()) {
        let summary = summarize(&items).unwrap();
        let sum: Decimal = summary.by_category.iter().map(|c| c.amount).sum();
        prop_assert_eq!(sum, summary.total_expenses);
        prop_assert_eq!(summary.balance, -summary.total_expenses);
        prop_assert_eq!(summary.total_income, Decimal::ZERO);
    }

    /// Walking every page reproduces the full filtered listing.
    #[test]
    fn prop_pages_partition_listing(
        rows in prop::collection::vec((category(), day()), 0..25),
        per_page in 1u32..8,
        since in day(),
    ) {
        let mut mock = MockRateProvider::new();
        mock.expect_rates().never();
        let ledger = LedgerStore::new(
            Arc::new(OpenDalStore::in_memory().unwrap()),
            Arc::new(Converter::new(Arc::new(mock))),
        );
        let filter = ExpenseFilter::all().since(since);

        block_on(async {
            for (cat, date) in rows {
                ledger.create(NewExpense::new(cat, Decimal::ONE, "USD", date)).await.unwrap();
            }
            let listed = ledger.list(&filter, true).await.unwrap();

            let mut walked = Vec::new();
            let mut page = 1;
            loop {
                let response = ledger
                    .list_page(PageRequest::new(page, per_page), &filter)
                    .await
                    .unwrap();
                prop_assert_eq!(response.total(), listed.len() as u64);
                if response.data.is_empty() {
                    break;
                }
                prop_assert!(response.data.len() <= per_page as usize);
                walked.extend(response.data);
                page += 1;
            }

            let walked_ids: Vec<_> = walked.iter().map(|e| e.id).collect();
            let listed_ids: Vec<_> = listed.iter().map(|e| e.id).collect();
            prop_assert_eq!(walked_ids, listed_ids);
            Ok::<(), TestCaseError>(())
        })?;
    }
}
