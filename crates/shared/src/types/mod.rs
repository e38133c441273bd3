//! Common types used across the application.

pub mod currency;
pub mod id;
pub mod pagination;

pub use currency::{CANONICAL_CURRENCY, CurrencyCode};
pub use id::ExpenseId;
pub use pagination::{PageMeta, PageRequest, PageResponse};
