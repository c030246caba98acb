use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Errors arising from currency code validation and registry lookups.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CurrencyError {
    #[error("currency code must be exactly three uppercase ASCII letters, got {0:?}")]
    InvalidCode(String),

    #[error("unsupported currency: {0}")]
    UnsupportedCurrency(String),
}

/// ISO 4217 currency code: exactly three uppercase ASCII letters.
///
/// Unlike a free-form identifier, construction is fallible — this hub only
/// ever deals in ISO 4217-shaped codes, never experimental settlement units.
///
/// # Examples
///
/// ```
/// use settlement_engine::core::currency::CurrencyCode;
///
/// let usd = CurrencyCode::new("USD").unwrap();
/// let brl = CurrencyCode::new("BRL").unwrap();
/// assert_ne!(usd, brl);
/// assert!(CurrencyCode::new("us").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl AsRef<str>) -> Result<Self, CurrencyError> {
        let code = code.as_ref();
        let valid = code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase());
        if !valid {
            return Err(CurrencyError::InvalidCode(code.to_string()));
        }
        Ok(Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = CurrencyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        value.0
    }
}

/// Process-wide ISO 4217 decimal-place table.
///
/// Initialised once from an embedded list on first use; lookup failure is a
/// validation error (`CurrencyError::UnsupportedCurrency`), never a panic.
pub struct CurrencyRegistry;

lazy_static::lazy_static! {
    static ref DECIMAL_PLACES_TABLE: HashMap<&'static str, u32> = [
        ("USD", 2),
        ("EUR", 2),
        ("GBP", 2),
        ("BRL", 2),
        ("INR", 2),
        ("CNY", 2),
        ("ZAR", 2),
        ("AED", 2),
        ("CHF", 2),
        ("CAD", 2),
        ("AUD", 2),
        ("JPY", 0),
        ("KRW", 0),
        ("KWD", 3),
        ("BHD", 3),
        ("OMR", 3),
    ]
    .into_iter()
    .collect();
}

impl CurrencyRegistry {
    /// Decimal places for a currency code, or `UnsupportedCurrency` if the
    /// registry has no entry for it.
    pub fn decimal_places(code: &CurrencyCode) -> Result<u32, CurrencyError> {
        DECIMAL_PLACES_TABLE
            .get(code.as_str())
            .copied()
            .ok_or_else(|| CurrencyError::UnsupportedCurrency(code.as_str().to_string()))
    }

    /// Whether the registry recognises this code at all.
    pub fn contains(code: &CurrencyCode) -> bool {
        DECIMAL_PLACES_TABLE.contains_key(code.as_str())
    }
}

/// Round `amount` to `dp` fractional digits using banker's rounding
/// (round-half-to-even).
///
/// The validator only ever uses this as an equality test
/// (`round_to(dp) == amount`), so the rounding mode does not affect
/// acceptance — any tie-breaking rule agrees with an already-conformant
/// value.
pub fn round_to(amount: Decimal, dp: u32) -> Decimal {
    amount.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven)
}

/// Parse a decimal string under the hub's strict grammar: optional leading
/// sign, digits, an optional `.` followed by digits. No exponents, no
/// underscores, no leading `+`/whitespace tolerance beyond that.
pub fn parse_decimal_strict(s: &str) -> Result<Decimal, CurrencyError> {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return Err(CurrencyError::InvalidCode(s.to_string()));
    }
    let mut i = 0;
    if bytes[i] == b'-' || bytes[i] == b'+' {
        i += 1;
    }
    let digits_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == digits_start {
        // No integer digits at all — reject ("-.5", "-", "").
        return Err(CurrencyError::InvalidCode(s.to_string()));
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == frac_start {
            return Err(CurrencyError::InvalidCode(s.to_string()));
        }
    }
    if i != bytes.len() {
        return Err(CurrencyError::InvalidCode(s.to_string()));
    }
    s.parse::<Decimal>()
        .map_err(|_| CurrencyError::InvalidCode(s.to_string()))
}

/// Canonical string form: no trailing fractional zeros, and no trailing
/// decimal point. `Decimal::normalize` implements exactly this.
pub fn canonical_decimal_string(amount: Decimal) -> String {
    amount.normalize().to_string()
}
