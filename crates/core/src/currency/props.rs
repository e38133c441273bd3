//! Property-based tests for conversion.
//!
//! - Same-currency conversion is the identity
//! - Batch conversion agrees with converting records one by one
//! - A batch makes at most one provider call per distinct currency

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::CurrencyCode;

use super::converter::{Convertible, Converter};
use super::provider::{RateProvider, RateProviderError, RateTable};

/// Provider quoting every base against a fixed USD table, counting calls.
struct CountingProvider {
    usd_rates: RateTable,
    calls: AtomicUsize,
}

impl CountingProvider {
    fn new(entries: &[(&str, Decimal)]) -> Self {
        Self {
            usd_rates: entries
                .iter()
                .map(|(code, rate)| (CurrencyCode::from(*code), *rate))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl RateProvider for CountingProvider {
    async fn currencies(&self) -> Result<Vec<CurrencyCode>, RateProviderError> {
        Ok(self.usd_rates.keys().cloned().collect())
    }

    async fn rates(
        &self,
        base: &CurrencyCode,
        _date: Option<NaiveDate>,
    ) -> Result<RateTable, RateProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let base_rate = self
            .usd_rates
            .get(base)
            .copied()
            .ok_or_else(|| RateProviderError::Malformed(format!("unknown base {base}")))?;
        Ok(self
            .usd_rates
            .iter()
            .filter_map(|(code, rate)| rate.checked_div(base_rate).map(|r| (code.clone(), r)))
            .collect())
    }
}

#[derive(Debug, Clone)]
struct Row {
    amount: Decimal,
    currency: CurrencyCode,
    converted: Decimal,
}

impl Convertible for Row {
    fn amount(&self) -> Decimal {
        self.amount
    }

    fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    fn set_converted_amount(&mut self, converted: Decimal) {
        self.converted = converted;
    }
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime")
        .block_on(future)
}

/// Strategy for signed amounts (-1,000,000.00 to 1,000,000.00).
fn amount() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for currency codes.
fn code() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["USD", "EUR", "GBP", "JPY", "CAD", "CHF", "XYZ"])
        .prop_map(str::to_string)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// convert(x, C, C) == x, with no provider traffic.
    #[test]
    fn prop_same_currency_is_identity(x in amount(), c in code()) {
        let provider = Arc::new(CountingProvider::new(&[]));
        let converter = Converter::new(provider.clone());
        let code = CurrencyCode::from(c);

        let converted = block_on(converter.convert(x, &code, &code)).unwrap();
        prop_assert_eq!(converted, x);
        prop_assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    /// With the cache already holding the currency, a batch equals one-by-one
    /// conversion and needs no provider call, whatever its size.
    #[test]
    fn prop_batch_matches_unit_conversion(
        amounts in prop::collection::vec(amount(), 1..40),
    ) {
        let provider = Arc::new(CountingProvider::new(&[
            ("USD", Decimal::ONE),
            ("EUR", Decimal::new(92, 2)),
        ]));
        let converter = Converter::new(provider.clone());
        let eur = CurrencyCode::from("EUR");

        block_on(async {
            converter.get_rates(None, converter.canonical()).await;
            let calls_before = provider.calls.load(Ordering::SeqCst);

            let rows: Vec<Row> = amounts
                .iter()
                .map(|a| Row { amount: *a, currency: eur.clone(), converted: Decimal::ZERO })
                .collect();
            let batch = converter.convert_batch(rows).await.unwrap();

            for (row, original) in batch.iter().zip(&amounts) {
                let single = converter.convert_to_canonical(*original, &eur).await.unwrap();
                prop_assert_eq!(row.converted, single);
            }
            prop_assert_eq!(provider.calls.load(Ordering::SeqCst), calls_before);
            Ok::<(), TestCaseError>(())
        })?;
    }

    /// A cold batch makes at most one call per distinct non-canonical currency.
    #[test]
    fn prop_batch_call_count_bounded(
        rows in prop::collection::vec((amount(), code()), 0..40),
    ) {
        let provider = Arc::new(CountingProvider::new(&[
            ("USD", Decimal::ONE),
            ("EUR", Decimal::new(92, 2)),
            ("GBP", Decimal::new(79, 2)),
            ("JPY", Decimal::from(150)),
            ("CAD", Decimal::new(136, 2)),
            ("CHF", Decimal::new(88, 2)),
        ]));
        let converter = Converter::new(provider.clone());

        let mut distinct: Vec<&str> = rows
            .iter()
            .map(|(_, c)| c.as_str())
            .filter(|c| *c != "USD")
            .collect();
        distinct.sort_unstable();
        distinct.dedup();

        let input: Vec<Row> = rows
            .iter()
            .map(|(a, c)| Row { amount: *a, currency: c.as_str().into(), converted: Decimal::ZERO })
            .collect();
        let out = block_on(converter.convert_batch(input)).unwrap();

        prop_assert!(provider.calls.load(Ordering::SeqCst) <= distinct.len());
        for (row, (a, c)) in out.iter().zip(&rows) {
            if c == "USD" {
                prop_assert_eq!(row.converted, *a);
            }
        }
    }
}
