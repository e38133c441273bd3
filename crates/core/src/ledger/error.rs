//! Ledger error types.

use tally_shared::AppError;
use tally_shared::types::ExpenseId;
use thiserror::Error;

use crate::currency::CurrencyError;
use crate::storage::StorageError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// No expense with the given id exists.
    #[error("Expense not found: {0}")]
    NotFound(ExpenseId),

    /// A new expense could not be built.
    #[error("Failed to add expense")]
    Creation(#[source] CurrencyError),

    /// An edited expense could not be re-normalized.
    #[error("Failed to convert expense: {0}")]
    Conversion(#[source] CurrencyError),

    /// Reading or writing the persisted collection failed.
    #[error("Persistence failed: {0}")]
    Persistence(#[from] StorageError),

    /// A summary total left the decimal range.
    #[error("Summary total overflowed at category '{category}'")]
    Overflow {
        /// Category whose amount could not be added.
        category: String,
    },

    /// The persisted collection could not be decoded.
    #[error("Stored expenses are corrupted: {0}")]
    Corrupted(String),
}

/// Result type alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotFound(_) => Self::NotFound(err.to_string()),
            LedgerError::Creation(ref source) => Self::Validation(format!("{err}: {source}")),
            LedgerError::Conversion(_) | LedgerError::Overflow { .. } => {
                Self::Validation(err.to_string())
            }
            LedgerError::Persistence(_) => Self::Storage(err.to_string()),
            LedgerError::Corrupted(_) => Self::Internal(err.to_string()),
        }
    }
}
