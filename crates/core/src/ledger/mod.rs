//! Expense ledger.
//!
//! This module implements the ledger store:
//! - Expense records and their create/update payloads
//! - Date and category filtering, and filter-window presets
//! - Category and balance aggregation
//! - Request recency tracking for superseded reads
//! - The store itself, which owns the persisted collection

pub mod error;
pub mod filter;
pub mod recency;
pub mod service;
pub mod summary;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::LedgerError;
pub use filter::{ExpenseFilter, FilterWindow};
pub use recency::{RequestToken, RequestTracker};
pub use service::{EXPENSES_KEY, LedgerStore, WindowView};
pub use summary::summarize;
pub use types::{CategoryTotal, Expense, ExpenseSummary, ExpenseUpdate, NewExpense};
