//! Exchange rate types and error definitions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::rates::currency::Currency;

/// A USD → local currency rate, rounded to whole local units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub value: u64,
    pub is_fallback: bool,
}

impl ExchangeRate {
    pub fn live(value: u64) -> Self {
        Self {
            value,
            is_fallback: false,
        }
    }

    pub fn fallback(value: u64) -> Self {
        Self {
            value,
            is_fallback: true,
        }
    }
}

/// A rate as a source reported it, before rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub raw: f64,
    /// The source already substituted its own fallback.
    pub is_fallback: bool,
}

impl Quote {
    pub fn live(raw: f64) -> Self {
        Self {
            raw,
            is_fallback: false,
        }
    }

    pub fn fallback(raw: f64) -> Self {
        Self {
            raw,
            is_fallback: true,
        }
    }
}

/// Round a raw upstream rate, rejecting values that cannot be used.
pub fn round_rate(raw: f64) -> Option<u64> {
    if !raw.is_finite() {
        return None;
    }
    let rounded = raw.round();
    if rounded < 1.0 || rounded > u64::MAX as f64 {
        return None;
    }
    Some(rounded as u64)
}

/// Errors from a rate source. Never shown to donors.
#[derive(Debug, Error)]
pub enum RateError {
    /// Connection, timeout or client construction failure.
    #[error("rate request failed: {0}")]
    Transport(String),

    /// The rate source answered with a non-success status.
    #[error("rate source returned status {0}")]
    Status(u16),

    /// The body could not be decoded.
    #[error("malformed rate response: {0}")]
    Decode(String),

    /// The body decoded but had no usable rate.
    #[error("no usable {0} rate in response")]
    Missing(Currency),
}

pub type RateResult<T> = Result<T, RateError>;

/// Body accepted by the rate endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateRequest {
    #[serde(default)]
    pub amount: Option<Decimal>,
}

/// Successful rate endpoint body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateResponse {
    pub rate: u64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
}

impl From<ExchangeRate> for RateResponse {
    fn from(rate: ExchangeRate) -> Self {
        Self {
            rate: rate.value,
            fallback: rate.is_fallback,
        }
    }
}

/// Rate endpoint failure body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Shape of the public exchange-rate API (`/latest/USD`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamRates {
    #[serde(default)]
    pub rates: HashMap<String, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_rate() {
        assert_eq!(round_rate(1532.4), Some(1532));
        assert_eq!(round_rate(1532.5), Some(1533));
        assert_eq!(round_rate(0.2), None);
        assert_eq!(round_rate(-5.0), None);
        assert_eq!(round_rate(f64::NAN), None);
    }

    #[test]
    fn test_fallback_flag_only_serialized_when_set() {
        let live = serde_json::to_value(RateResponse::from(ExchangeRate::live(1480))).unwrap();
        assert_eq!(live, serde_json::json!({ "rate": 1480 }));

        let fallback = serde_json::to_value(RateResponse::from(ExchangeRate::fallback(1500))).unwrap();
        assert_eq!(fallback, serde_json::json!({ "rate": 1500, "fallback": true }));
    }

    #[test]
    fn test_rate_request_accepts_numbers_and_strings() {
        let req: RateRequest = serde_json::from_str(r#"{"amount": 2.5}"#).unwrap();
        assert_eq!(req.amount, Some(Decimal::new(25, 1)));

        let req: RateRequest = serde_json::from_str(r#"{"amount": "10"}"#).unwrap();
        assert_eq!(req.amount, Some(Decimal::from(10)));

        let req: RateRequest = serde_json::from_str("{}").unwrap();
        assert!(req.amount.is_none());
    }

    #[test]
    fn test_error_display() {
        let err = RateError::Missing(Currency::Ngn);
        assert_eq!(err.to_string(), "no usable NGN rate in response");
        assert_eq!(RateError::Status(503).to_string(), "rate source returned status 503");
    }
}
