//! Point-in-time exchange rate snapshot.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tally_shared::types::CurrencyCode;

use super::conversion::cross_rate;
use super::provider::RateTable;

/// The most recently fetched rate table.
///
/// Empty until the first successful fetch. Each successful fetch replaces the
/// whole table; entries from earlier fetches never survive. `sequence`
/// identifies the fetch that produced the snapshot so a slow, older response
/// cannot overwrite a newer one.
#[derive(Debug, Clone, Default)]
pub struct RateCache {
    base: Option<CurrencyCode>,
    rates: RateTable,
    sequence: u64,
    fetched_at: Option<DateTime<Utc>>,
}

impl RateCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a live (positive) rate for `code`.
    #[must_use]
    pub fn rate(&self, code: &CurrencyCode) -> Option<Decimal> {
        self.rates
            .get(code)
            .copied()
            .filter(|rate| *rate > Decimal::ZERO)
    }

    /// Rate converting `from` into `to`, if both have live entries.
    #[must_use]
    pub fn cross_rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> Option<Decimal> {
        cross_rate(self.rate(from)?, self.rate(to)?)
    }

    /// Replaces the snapshot if `sequence` is newer than the installed one.
    ///
    /// Returns false (and leaves the cache untouched) for stale responses.
    pub fn install(&mut self, sequence: u64, base: CurrencyCode, rates: RateTable) -> bool {
        if sequence <= self.sequence {
            return false;
        }
        self.sequence = sequence;
        self.base = Some(base);
        self.rates = rates;
        self.fetched_at = Some(Utc::now());
        true
    }

    /// Base currency of the snapshot.
    #[must_use]
    pub fn base(&self) -> Option<&CurrencyCode> {
        self.base.as_ref()
    }

    /// The full rate table.
    #[must_use]
    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// When the snapshot was installed.
    #[must_use]
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// Returns true if nothing has been fetched yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
