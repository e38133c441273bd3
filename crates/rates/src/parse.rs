//! Response body decoding.
//!
//! Both endpoints wrap their payload in a `data` object keyed by currency
//! code:
//!
//! ```text
//! /currencies  {"data": {"EUR": {"code": "EUR", "name": "Euro", ...}, ...}}
//! /latest      {"meta": {...}, "data": {"EUR": {"code": "EUR", "value": 0.92}, ...}}
//! ```

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};
use tally_core::currency::{RateProviderError, RateTable};
use tally_shared::types::CurrencyCode;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct Envelope {
    data: Option<Map<String, Value>>,
}

fn data(body: &[u8]) -> Result<Map<String, Value>, RateProviderError> {
    let envelope: Envelope = serde_json::from_slice(body)
        .map_err(|e| RateProviderError::Malformed(format!("invalid JSON body: {e}")))?;
    envelope
        .data
        .ok_or_else(|| RateProviderError::Malformed("missing data object".to_string()))
}

/// Decodes a `/currencies` body into its currency codes.
pub fn parse_currencies(body: &[u8]) -> Result<Vec<CurrencyCode>, RateProviderError> {
    Ok(data(body)?.into_iter().map(|(code, _)| code.into()).collect())
}

/// Decodes a `/latest` or `/historical` body into a rate table.
///
/// Entries without a usable numeric `value` are skipped.
pub fn parse_rates(body: &[u8]) -> Result<RateTable, RateProviderError> {
    let mut rates = RateTable::new();
    for (code, entry) in data(body)? {
        match entry.get("value").and_then(decimal) {
            Some(rate) => {
                rates.insert(code.into(), rate);
            }
            None => debug!(code, "Skipping entry without a rate"),
        }
    }
    Ok(rates)
}

/// Reads a JSON number (or numeric string) as a decimal without going
/// through floating point.
fn decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_currencies() {
        let body = br#"{"data": {"EUR": {"code": "EUR", "name": "Euro"}, "USD": {"code": "USD"}}}"#;
        let codes = parse_currencies(body).unwrap();
        let mut codes: Vec<_> = codes.iter().map(CurrencyCode::as_str).collect();
        codes.sort_unstable();
        assert_eq!(codes, vec!["EUR", "USD"]);
    }

    #[test]
    fn test_parse_rates_skips_unusable_entries() {
        let body = br#"{
            "meta": {"last_updated_at": "2024-01-05T23:59:59Z"},
            "data": {
                "EUR": {"code": "EUR", "value": 0.91},
                "JPY": {"code": "JPY", "value": 144.2},
                "GBP": {"code": "GBP", "value": null},
                "CAD": {"code": "CAD"},
                "XAU": {"code": "XAU", "value": "n/a"}
            }
        }"#;
        let rates = parse_rates(body).unwrap();
        assert_eq!(rates.len(), 2);
        assert_eq!(rates[&CurrencyCode::from("EUR")], dec!(0.91));
        assert_eq!(rates[&CurrencyCode::from("JPY")], dec!(144.2));
    }

    #[rstest]
    #[case(br#"not json"#.as_slice())]
    #[case(br#"{"meta": {}}"#.as_slice())]
    #[case(br#"{"data": null}"#.as_slice())]
    #[case(br#"{"data": [1, 2]}"#.as_slice())]
    fn test_malformed_bodies(#[case] body: &[u8]) {
        assert!(matches!(parse_rates(body), Err(RateProviderError::Malformed(_))));
        assert!(matches!(parse_currencies(body), Err(RateProviderError::Malformed(_))));
    }

    #[rstest]
    #[case(serde_json::json!(1.1), Some(dec!(1.1)))]
    #[case(serde_json::json!(110), Some(dec!(110)))]
    #[case(serde_json::json!("0.000012"), Some(dec!(0.000012)))]
    #[case(serde_json::json!(1.2e-5), Some(dec!(0.000012)))]
    #[case(serde_json::json!(true), None)]
    fn test_decimal(#[case] value: Value, #[case] expected: Option<Decimal>) {
        assert_eq!(decimal(&value), expected);
    }
}
