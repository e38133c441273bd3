//! The external rate provider seam.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tally_shared::types::CurrencyCode;
use thiserror::Error;

/// Rates keyed by currency code, each relative to one base currency.
pub type RateTable = HashMap<CurrencyCode, Decimal>;

/// Ways a provider request can fail.
///
/// All variants are treated alike by the converter: the request failed and a
/// fallback applies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateProviderError {
    /// The request never produced a response (connection, DNS, timeout).
    #[error("rate provider unreachable: {0}")]
    Transport(String),

    /// The provider answered with a non-2xx status.
    #[error("rate provider returned HTTP {0}")]
    Status(u16),

    /// The body could not be understood.
    #[error("rate provider returned a malformed body: {0}")]
    Malformed(String),
}

/// Source of currency lists and exchange rates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Lists every currency code the provider can quote.
    async fn currencies(&self) -> Result<Vec<CurrencyCode>, RateProviderError>;

    /// Fetches rates relative to `base`, either latest (`date == None`) or
    /// historical for `date`.
    async fn rates(
        &self,
        base: &CurrencyCode,
        date: Option<NaiveDate>,
    ) -> Result<RateTable, RateProviderError>;
}
