//! Exchange-rate provider client for Tally.
//!
//! Implements [`tally_core::currency::RateProvider`] against a
//! currencyapi-style v3 HTTP API.

pub mod client;
pub mod parse;

pub use client::{API_KEY_HEADER, ClientError, CurrencyApiClient};
