//! currencyapi-style HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue};
use tally_core::currency::{RateProvider, RateProviderError, RateTable};
use tally_shared::config::RatesConfig;
use tally_shared::types::CurrencyCode;
use thiserror::Error;
use tracing::debug;

use crate::parse::{parse_currencies, parse_rates};

/// Header carrying the static API credential.
pub const API_KEY_HEADER: &str = "apikey";

/// Errors building the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The API key cannot be sent as a header value.
    #[error("API key contains characters not allowed in a header")]
    InvalidApiKey,

    /// The underlying HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Rate provider over the currencyapi v3 endpoints.
#[derive(Debug, Clone)]
pub struct CurrencyApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl CurrencyApiClient {
    /// Builds a client from configuration.
    ///
    /// The API key goes into a default header and the timeout applies to
    /// every request.
    pub fn new(config: &RatesConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        let mut key =
            HeaderValue::from_str(&config.api_key).map_err(|_| ClientError::InvalidApiKey)?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<u8>, RateProviderError> {
        let url = format!("{}/{path}", self.base_url);
        debug!(%url, ?query, "Requesting rates");

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| RateProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RateProviderError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RateProviderError::Transport(e.to_string()))?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl RateProvider for CurrencyApiClient {
    async fn currencies(&self) -> Result<Vec<CurrencyCode>, RateProviderError> {
        let body = self.fetch("currencies", &[]).await?;
        parse_currencies(&body)
    }

    async fn rates(
        &self,
        base: &CurrencyCode,
        date: Option<NaiveDate>,
    ) -> Result<RateTable, RateProviderError> {
        let mut query = vec![("base_currency", base.to_string())];
        let path = match date {
            Some(date) => {
                query.push(("date", date.format("%Y-%m-%d").to_string()));
                "historical"
            }
            None => "latest",
        };
        let body = self.fetch(path, &query).await?;
        parse_rates(&body)
    }
}
