//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Every section has defaults so a minimal file only needs the public key.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::crypto::CryptoAsset;
use crate::rates::Currency;

/// Root configuration for the donation service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DonationConfig {
    /// HTTP listener and middleware settings.
    pub server: ServerConfig,

    /// Exchange rate lookup.
    pub rates: RatesConfig,

    /// Hosted payment widget.
    pub payments: PaymentsConfig,

    /// Crypto donation panel.
    pub crypto: CryptoConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Whole-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Add nosniff/frame/referrer headers to every response.
    pub security_headers: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            request_timeout_secs: 30,
            max_body_bytes: 16 * 1024,
            security_headers: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RatesConfig {
    /// Base URL of the public exchange-rate API; `/latest/USD` is appended.
    pub api_base_url: String,

    /// Rate lookup timeout in seconds.
    pub timeout_secs: u64,

    /// Overrides the currency's built-in fallback rate.
    pub fallback_rate: Option<u64>,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.exchangerate-api.com/v4".to_string(),
            timeout_secs: 10,
            fallback_rate: None,
        }
    }
}

impl RatesConfig {
    pub fn fallback_for(&self, currency: Currency) -> u64 {
        self.fallback_rate.unwrap_or_else(|| currency.fallback_rate())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PaymentsConfig {
    /// Widget public key. `PAYSTACK_PUBLIC_KEY` overrides it.
    pub public_key: String,

    /// Charge currency.
    pub currency: Currency,

    /// Widget script location.
    pub script_url: String,

    /// Fetch the script once at startup to confirm it loads.
    pub verify_script: bool,

    /// Overrides the currency's minimum charge (minor units).
    pub minimum_minor: Option<u64>,

    /// Return the local-currency preview with each donation.
    pub show_preview: bool,

    /// How long a finished donation stays queryable, in seconds.
    pub intent_retention_secs: u64,

    /// Widget sessions allowed to wait on a callback at once.
    pub max_open_sessions: usize,
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self {
            public_key: String::new(),
            currency: Currency::Ngn,
            script_url: "https://js.paystack.co/v1/inline.js".to_string(),
            verify_script: true,
            minimum_minor: None,
            show_preview: false,
            intent_retention_secs: 300, // 5 minutes
            max_open_sessions: 1000,
        }
    }
}

impl PaymentsConfig {
    pub fn effective_minimum(&self) -> u64 {
        self.minimum_minor
            .unwrap_or_else(|| self.currency.minimum_minor())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CryptoConfig {
    /// How long the "copied" flag stays on, in milliseconds.
    pub copied_indicator_ms: u64,

    /// Wallet address per asset. Assets left out are not shown.
    pub wallets: BTreeMap<CryptoAsset, String>,
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            copied_indicator_ms: 2000,
            wallets: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins.
    pub log_level: String,

    /// Enable the Prometheus endpoint.
    pub metrics_enabled: bool,

    /// Prometheus endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
