//! Rate cache owner and conversion entry point.
//!
//! Conversion favours availability over precision. Every provider failure
//! resolves to a cached snapshot or a static rate; the only error a caller can
//! see is arithmetic overflow.
//!
//! ```text
//! convert(amount, from, to)
//!   from == to                    -> amount                 (SameCurrency)
//!   cache has from and to         -> amount * to/from       (Cache)
//!   fetch rates(base = from) ok   -> amount * rates[to]     (Provider)
//!   otherwise                     -> amount * fallback(to)  (StaticFallback)
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tally_shared::types::CurrencyCode;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::cache::RateCache;
use super::conversion::apply_rate;
use super::error::CurrencyError;
use super::fallback::{fallback_currencies, fallback_rate};
use super::provider::{RateProvider, RateProviderError, RateTable};

/// Where a conversion rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    /// Source and target are the same currency; no rate needed.
    SameCurrency,
    /// Cross rate computed from the cached snapshot.
    Cache,
    /// Fresh provider response.
    Provider,
    /// Provider failed or omitted the target; built-in table used.
    StaticFallback,
}

/// Result of a single conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversion {
    /// Converted amount.
    pub amount: Decimal,
    /// Rate applied (1 for same-currency).
    pub rate: Decimal,
    /// How the rate was obtained.
    pub source: RateSource,
}

/// Where a rate table returned by [`Converter::get_rates_detailed`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    /// Fresh provider response.
    Provider,
    /// Provider failed; the last cached snapshot (possibly empty) is returned.
    CachedAfterFailure,
}

/// A rate table plus its provenance.
#[derive(Debug, Clone)]
pub struct RatesSnapshot {
    /// Base the rates are quoted against, if known.
    pub base: Option<CurrencyCode>,
    /// Rates keyed by currency code.
    pub rates: RateTable,
    /// How the table was obtained.
    pub source: SnapshotSource,
}

/// A record carrying an amount that can be normalized in bulk.
pub trait Convertible {
    /// Amount in the record's own currency.
    fn amount(&self) -> Decimal;
    /// The record's currency.
    fn currency(&self) -> &CurrencyCode;
    /// Stores the canonical amount on the record.
    fn set_converted_amount(&mut self, converted: Decimal);
}

/// Owns the rate cache and the supported-currency list.
///
/// Constructed once per process and shared behind an `Arc`. Both pieces of
/// state change only through this type's operations.
pub struct Converter {
    provider: Arc<dyn RateProvider>,
    canonical: CurrencyCode,
    cache: RwLock<RateCache>,
    supported: RwLock<Vec<CurrencyCode>>,
    fetch_sequence: AtomicU64,
}

impl Converter {
    /// Creates a converter normalizing into the canonical currency.
    #[must_use]
    pub fn new(provider: Arc<dyn RateProvider>) -> Self {
        Self {
            provider,
            canonical: CurrencyCode::canonical(),
            cache: RwLock::new(RateCache::new()),
            supported: RwLock::new(fallback_currencies()),
            fetch_sequence: AtomicU64::new(0),
        }
    }

    /// The canonical reporting currency.
    #[must_use]
    pub fn canonical(&self) -> &CurrencyCode {
        &self.canonical
    }

    /// Copy of the current rate cache.
    pub async fn cached_rates(&self) -> RateCache {
        self.cache.read().await.clone()
    }

    /// Lists currencies available for entry.
    ///
    /// On success the provider's list replaces the stored one. On failure the
    /// previous list (initially the built-in fallback) is returned.
    pub async fn list_supported_currencies(&self) -> Vec<CurrencyCode> {
        let fetched = match self.provider.currencies().await {
            Ok(codes) if codes.is_empty() => Err(RateProviderError::Malformed(
                "empty currency list".to_string(),
            )),
            other => other,
        };

        match fetched {
            Ok(codes) => {
                debug!(count = codes.len(), "Supported currencies refreshed");
                *self.supported.write().await = codes.clone();
                codes
            }
            Err(err) => {
                warn!(error = %err, "Failed to fetch currencies, using previous list");
                self.supported.read().await.clone()
            }
        }
    }

    /// Fetches rates relative to `base`, latest or as of `as_of`.
    ///
    /// On success the cache is replaced and the fresh table returned. On
    /// failure the last cached table is returned unchanged.
    pub async fn get_rates(&self, as_of: Option<NaiveDate>, base: &CurrencyCode) -> RateTable {
        self.get_rates_detailed(as_of, base).await.rates
    }

    /// Like [`Converter::get_rates`], tagged with where the table came from.
    pub async fn get_rates_detailed(
        &self,
        as_of: Option<NaiveDate>,
        base: &CurrencyCode,
    ) -> RatesSnapshot {
        let sequence = self.fetch_sequence.fetch_add(1, Ordering::SeqCst) + 1;

        match self.provider.rates(base, as_of).await {
            Ok(mut rates) => {
                rates.retain(|_, rate| *rate > Decimal::ZERO);
                rates.entry(base.clone()).or_insert(Decimal::ONE);

                let installed = self
                    .cache
                    .write()
                    .await
                    .install(sequence, base.clone(), rates.clone());
                if installed {
                    debug!(base = %base, count = rates.len(), "Rate cache replaced");
                } else {
                    debug!(base = %base, sequence, "Discarding out-of-order rate response");
                }

                RatesSnapshot {
                    base: Some(base.clone()),
                    rates,
                    source: SnapshotSource::Provider,
                }
            }
            Err(err) => {
                warn!(base = %base, error = %err, "Failed to fetch exchange rates, using cache");
                let cache = self.cache.read().await;
                RatesSnapshot {
                    base: cache.base().cloned(),
                    rates: cache.rates().clone(),
                    source: SnapshotSource::CachedAfterFailure,
                }
            }
        }
    }

    /// Converts `amount` from `from` into the canonical currency.
    pub async fn convert_to_canonical(
        &self,
        amount: Decimal,
        from: &CurrencyCode,
    ) -> Result<Decimal, CurrencyError> {
        self.convert(amount, from, &self.canonical).await
    }

    /// Converts `amount` from `from` into `to`.
    pub async fn convert(
        &self,
        amount: Decimal,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<Decimal, CurrencyError> {
        Ok(self.convert_detailed(amount, from, to).await?.amount)
    }

    /// Like [`Converter::convert`], reporting the rate and its source.
    pub async fn convert_detailed(
        &self,
        amount: Decimal,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<Conversion, CurrencyError> {
        if from == to {
            return Ok(Conversion {
                amount,
                rate: Decimal::ONE,
                source: RateSource::SameCurrency,
            });
        }

        let (rate, source) = self.resolve_rate(from, to).await;
        let converted = apply_rate(amount, rate).ok_or_else(|| CurrencyError::Overflow {
            amount,
            from: from.clone(),
            to: to.clone(),
        })?;

        Ok(Conversion {
            amount: converted,
            rate,
            source,
        })
    }

    /// Fills in the canonical amount of every record.
    ///
    /// Rates are resolved once per distinct non-canonical currency, in
    /// first-encounter order, so the provider sees at most one request per
    /// such currency and none at all for an all-canonical batch.
    pub async fn convert_batch<T: Convertible>(
        &self,
        mut records: Vec<T>,
    ) -> Result<Vec<T>, CurrencyError> {
        let mut distinct: Vec<CurrencyCode> = Vec::new();
        for record in &records {
            let currency = record.currency();
            if *currency != self.canonical && !distinct.contains(currency) {
                distinct.push(currency.clone());
            }
        }
        debug!(
            records = records.len(),
            currencies = distinct.len(),
            "Converting batch"
        );

        let mut rates: HashMap<CurrencyCode, Decimal> = HashMap::with_capacity(distinct.len());
        for currency in distinct {
            let (rate, _) = self.resolve_rate(&currency, &self.canonical).await;
            rates.insert(currency, rate);
        }

        for record in &mut records {
            let amount = record.amount();
            let converted = match rates.get(record.currency()) {
                None => amount,
                Some(rate) => apply_rate(amount, *rate).ok_or_else(|| CurrencyError::Overflow {
                    amount,
                    from: record.currency().clone(),
                    to: self.canonical.clone(),
                })?,
            };
            record.set_converted_amount(converted);
        }

        Ok(records)
    }

    /// Finds the rate taking `from` to `to` (assumed different).
    async fn resolve_rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> (Decimal, RateSource) {
        if let Some(rate) = self.cache.read().await.cross_rate(from, to) {
            debug!(from = %from, to = %to, "Rate served from cache");
            return (rate, RateSource::Cache);
        }

        let snapshot = self.get_rates_detailed(None, from).await;
        if snapshot.source == SnapshotSource::Provider {
            if let Some(rate) = snapshot.rates.get(to).copied() {
                return (rate, RateSource::Provider);
            }
        }

        let rate = fallback_rate(to);
        warn!(from = %from, to = %to, rate = %rate, "Using fallback conversion rate");
        (rate, RateSource::StaticFallback)
    }
}
