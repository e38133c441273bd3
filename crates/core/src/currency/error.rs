//! Conversion error types.

use rust_decimal::Decimal;
use tally_shared::types::CurrencyCode;
use thiserror::Error;

/// Errors a conversion can raise.
///
/// Provider failures are never reported here; they resolve to a cached or
/// static rate instead.
#[derive(Debug, Error)]
pub enum CurrencyError {
    /// The converted value does not fit in a `Decimal`.
    #[error("Converting {amount} {from} to {to} overflowed")]
    Overflow {
        /// Source amount.
        amount: Decimal,
        /// Source currency.
        from: CurrencyCode,
        /// Target currency.
        to: CurrencyCode,
    },
}
