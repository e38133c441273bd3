//! Ledger store: the persisted expense collection and its operations.
//!
//! The whole collection lives under one key and is rewritten on every
//! mutation. Reads always go through serde so dates come back typed.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tally_shared::types::{ExpenseId, PageRequest, PageResponse};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::error::{LedgerError, LedgerResult};
use super::filter::ExpenseFilter;
use super::recency::RequestTracker;
use super::summary::summarize;
use super::types::{Expense, ExpenseSummary, ExpenseUpdate, NewExpense};
use crate::currency::Converter;
use crate::storage::{KeyValueStore, StorageError};

/// Storage key holding the expense collection.
pub const EXPENSES_KEY: &str = "expenses";

/// Expenses and their summary for one filter window.
#[derive(Debug, Clone)]
pub struct WindowView {
    /// Matching expenses, most recent first.
    pub expenses: Vec<Expense>,
    /// Aggregates over `expenses`.
    pub summary: ExpenseSummary,
}

/// Owns the expense collection.
///
/// Writers are serialized by an internal mutex held across each
/// read-modify-write cycle.
pub struct LedgerStore {
    store: Arc<dyn KeyValueStore>,
    converter: Arc<Converter>,
    write_lock: Mutex<()>,
    tracker: RequestTracker,
}

impl LedgerStore {
    /// Creates a store over `store`, normalizing amounts with `converter`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, converter: Arc<Converter>) -> Self {
        Self {
            store,
            converter,
            write_lock: Mutex::new(()),
            tracker: RequestTracker::new(),
        }
    }

    /// The converter used for normalization.
    #[must_use]
    pub fn converter(&self) -> &Arc<Converter> {
        &self.converter
    }

    /// Lists expenses matching `filter`, in collection order.
    ///
    /// With `convert_to_canonical`, every returned record's converted amount
    /// is refreshed against current rates. The refreshed values are not
    /// persisted.
    pub async fn list(
        &self,
        filter: &ExpenseFilter,
        convert_to_canonical: bool,
    ) -> LedgerResult<Vec<Expense>> {
        let expenses = filter.apply(self.load_all().await?);
        if !convert_to_canonical || expenses.is_empty() {
            return Ok(expenses);
        }
        self.converter
            .convert_batch(expenses)
            .await
            .map_err(LedgerError::Conversion)
    }

    /// Lists one page of the filtered expenses.
    ///
    /// `meta.total` counts the whole filtered result. Pages past the end
    /// are empty.
    pub async fn list_page(
        &self,
        request: PageRequest,
        filter: &ExpenseFilter,
    ) -> LedgerResult<PageResponse<Expense>> {
        let expenses = self.list(filter, true).await?;
        let total = u64::try_from(expenses.len()).unwrap_or(u64::MAX);
        let data = request.slice(&expenses);
        Ok(PageResponse::new(data, request.page, request.per_page, total))
    }

    /// Records a new expense at the front of the collection.
    pub async fn create(&self, input: NewExpense) -> LedgerResult<Expense> {
        let _guard = self.write_lock.lock().await;

        let converted_amount = self
            .converter
            .convert_to_canonical(input.amount, &input.currency)
            .await
            .map_err(LedgerError::Creation)?;

        let now = Utc::now();
        let expense = Expense {
            id: ExpenseId::new(),
            category: input.category,
            amount: input.amount,
            currency: input.currency,
            converted_amount,
            date: input.date,
            merchant: input.merchant,
            receipt: input.receipt,
            created_at: now,
            updated_at: now,
        };

        let mut expenses = self.load_all().await?;
        expenses.insert(0, expense.clone());
        self.save_all(&expenses).await?;

        info!(expense_id = %expense.id, category = %expense.category, "Expense created");
        Ok(expense)
    }

    /// Merges `changes` onto an existing expense, keeping its position.
    ///
    /// The converted amount is recomputed only when the amount or currency
    /// changes.
    pub async fn update(&self, id: ExpenseId, changes: ExpenseUpdate) -> LedgerResult<Expense> {
        let _guard = self.write_lock.lock().await;

        let mut expenses = self.load_all().await?;
        let index = expenses
            .iter()
            .position(|e| e.id == id)
            .ok_or(LedgerError::NotFound(id))?;

        let mut expense = expenses[index].clone();
        let reconvert = changes.changes_money();
        changes.apply_to(&mut expense);
        if reconvert {
            expense.converted_amount = self
                .converter
                .convert_to_canonical(expense.amount, &expense.currency)
                .await
                .map_err(LedgerError::Conversion)?;
        }
        expense.updated_at = Utc::now();

        expenses[index] = expense.clone();
        self.save_all(&expenses).await?;

        info!(expense_id = %id, category = %expense.category, reconverted = reconvert, "Expense updated");
        Ok(expense)
    }

    /// Removes an expense.
    pub async fn delete(&self, id: ExpenseId) -> LedgerResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut expenses = self.load_all().await?;
        let index = expenses
            .iter()
            .position(|e| e.id == id)
            .ok_or(LedgerError::NotFound(id))?;
        let removed = expenses.remove(index);
        self.save_all(&expenses).await?;

        info!(expense_id = %id, category = %removed.category, "Expense deleted");
        Ok(())
    }

    /// Aggregates the expenses matching `filter`.
    pub async fn summarize(&self, filter: &ExpenseFilter) -> LedgerResult<ExpenseSummary> {
        let expenses = self.list(filter, true).await?;
        summarize(&expenses)
    }

    /// Loads expenses and summary for a window.
    ///
    /// Returns `None` if another `load_window` started before this one
    /// finished; the caller should drop the result.
    pub async fn load_window(&self, filter: &ExpenseFilter) -> LedgerResult<Option<WindowView>> {
        let token = self.tracker.begin();

        let expenses = self.list(filter, true).await?;
        let summary = summarize(&expenses)?;

        if !self.tracker.is_current(token) {
            debug!(?token, "Discarding superseded window load");
            return Ok(None);
        }
        Ok(Some(WindowView { expenses, summary }))
    }

    async fn load_all(&self) -> LedgerResult<Vec<Expense>> {
        match self.store.get(EXPENSES_KEY).await? {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => {
                serde_json::from_value(value).map_err(|e| LedgerError::Corrupted(e.to_string()))
            }
        }
    }

    async fn save_all(&self, expenses: &[Expense]) -> LedgerResult<()> {
        let value = serde_json::to_value(expenses)
            .map_err(|e| StorageError::serialization(EXPENSES_KEY, &e))?;
        self.store.set(EXPENSES_KEY, &value).await?;
        Ok(())
    }
}
