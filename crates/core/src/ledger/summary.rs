//! Expense aggregation.

use rust_decimal::Decimal;

use super::error::{LedgerError, LedgerResult};
use super::types::{CategoryTotal, Expense, ExpenseSummary};

/// Aggregates canonical amounts into totals and per-category sums.
///
/// Categories appear in order of first encounter. Every record counts toward
/// `total_expenses`, negative amounts included; `total_income` stays zero.
///
/// # Errors
///
/// Returns [`LedgerError::Overflow`] if a running total leaves the decimal
/// range.
pub fn summarize(expenses: &[Expense]) -> LedgerResult<ExpenseSummary> {
    let mut by_category: Vec<CategoryTotal> = Vec::new();
    let mut total_expenses = Decimal::ZERO;

    for expense in expenses {
        let overflow = || LedgerError::Overflow {
            category: expense.category.clone(),
        };
        total_expenses = total_expenses
            .checked_add(expense.converted_amount)
            .ok_or_else(overflow)?;
        match by_category
            .iter_mut()
            .find(|c| c.category == expense.category)
        {
            Some(total) => {
                total.amount = total
                    .amount
                    .checked_add(expense.converted_amount)
                    .ok_or_else(overflow)?;
            }
            None => by_category.push(CategoryTotal {
                category: expense.category.clone(),
                amount: expense.converted_amount,
            }),
        }
    }

    // Income is not tracked, so the balance is the negated spend.
    Ok(ExpenseSummary {
        total_expenses,
        total_income: Decimal::ZERO,
        balance: -total_expenses,
        by_category,
    })
}
