//! Currency codes.
//!
//! Codes are free-form ISO-like strings exactly as the user entered them.
//! The engine never validates them against a fixed list; the provider decides
//! which codes it knows.

use serde::{Deserialize, Serialize};

/// The single reporting currency every amount is normalized into.
pub const CANONICAL_CURRENCY: &str = "USD";

/// An ISO-like currency code such as `USD` or `EUR`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Wraps a code as given.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The canonical reporting currency.
    #[must_use]
    pub fn canonical() -> Self {
        Self(CANONICAL_CURRENCY.to_string())
    }

    /// Returns true if this is the canonical reporting currency.
    #[must_use]
    pub fn is_canonical(&self) -> bool {
        self.0 == CANONICAL_CURRENCY
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for CurrencyCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl std::borrow::Borrow<str> for CurrencyCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}
