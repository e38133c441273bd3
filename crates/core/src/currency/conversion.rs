//! Currency conversion arithmetic.
//!
//! Rounding strategy:
//! - Converted amounts keep 4 decimal places
//! - Use banker's rounding (round half to even)
//! - The original amount is stored alongside, never overwritten

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept on converted amounts.
pub const CONVERSION_DECIMAL_PLACES: u32 = 4;

/// Multiplies `amount` by `rate` and rounds with banker's rounding.
///
/// Returns `None` on overflow.
#[must_use]
pub fn apply_rate(amount: Decimal, rate: Decimal) -> Option<Decimal> {
    amount.checked_mul(rate).map(|converted| {
        converted.round_dp_with_strategy(
            CONVERSION_DECIMAL_PLACES,
            RoundingStrategy::MidpointNearestEven,
        )
    })
}

/// Rate taking `from` to `to` when both are quoted against the same base.
///
/// `rate[to] / rate[from]`; `None` if `from_rate` is zero or the division
/// overflows.
#[must_use]
pub fn cross_rate(from_rate: Decimal, to_rate: Decimal) -> Option<Decimal> {
    to_rate.checked_div(from_rate)
}
