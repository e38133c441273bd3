//! Built-in tables used when the rate provider cannot be reached.
//!
//! The rates are rough, USD-based, and only ever consulted after a failed
//! fetch. They favour returning a usable number over precision.

use rust_decimal::Decimal;
use tally_shared::types::CurrencyCode;

/// Currency codes offered for entry before the provider has answered.
pub const FALLBACK_CURRENCIES: [&str; 5] = ["USD", "EUR", "GBP", "JPY", "CAD"];

/// The built-in supported-currency set.
#[must_use]
pub fn fallback_currencies() -> Vec<CurrencyCode> {
    FALLBACK_CURRENCIES.iter().copied().map(CurrencyCode::from).collect()
}

/// Approximate multiplier for converting into `to`; 1 for unknown codes.
#[must_use]
pub fn fallback_rate(to: &CurrencyCode) -> Decimal {
    match to.as_str() {
        "EUR" => Decimal::new(85, 2),
        "GBP" => Decimal::new(75, 2),
        "JPY" => Decimal::from(110),
        "CAD" => Decimal::new(125, 2),
        "AUD" => Decimal::new(135, 2),
        _ => Decimal::ONE,
    }
}
