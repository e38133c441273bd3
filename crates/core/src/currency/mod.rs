//! Exchange rates and conversion into the canonical reporting currency.
//!
//! The [`Converter`] owns the only rate cache in the process. Everything that
//! needs a canonical amount asks the converter; nothing else reads or writes
//! the cache.

pub mod cache;
pub mod conversion;
pub mod converter;
pub mod error;
pub mod fallback;
pub mod provider;

#[cfg(test)]
mod props;

pub use cache::RateCache;
pub use conversion::{CONVERSION_DECIMAL_PLACES, apply_rate};
pub use converter::{Conversion, Convertible, Converter, RateSource, RatesSnapshot, SnapshotSource};
pub use error::CurrencyError;
pub use fallback::{FALLBACK_CURRENCIES, fallback_currencies, fallback_rate};
pub use provider::{RateProvider, RateProviderError, RateTable};

#[cfg(test)]
pub use provider::MockRateProvider;
