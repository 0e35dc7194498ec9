//! Configuration validation.
//!
//! Semantic checks only; serde already handled syntax. Returns every
//! problem found, not just the first.

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::DonationConfig;
use crate::crypto::CryptoAsset;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is not a socket address: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} is not a valid http(s) URL: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("payments.public_key is empty (set PAYSTACK_PUBLIC_KEY)")]
    MissingPublicKey,

    #[error("payments.public_key looks like a secret key; only public keys may reach the page")]
    SecretKeyExposed,

    #[error("crypto.wallets.{0} is empty")]
    EmptyWallet(CryptoAsset),
}

pub fn validate_config(config: &DonationConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "server.bind_address",
            value: config.server.bind_address.clone(),
        });
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::Zero("server.request_timeout_secs"));
    }
    if config.server.max_body_bytes == 0 {
        errors.push(ValidationError::Zero("server.max_body_bytes"));
    }

    check_url(&mut errors, "rates.api_base_url", &config.rates.api_base_url);
    if config.rates.timeout_secs == 0 {
        errors.push(ValidationError::Zero("rates.timeout_secs"));
    }
    if config.rates.fallback_rate == Some(0) {
        errors.push(ValidationError::Zero("rates.fallback_rate"));
    }

    let key = config.payments.public_key.trim();
    if key.is_empty() {
        errors.push(ValidationError::MissingPublicKey);
    } else if key.starts_with("sk_") {
        errors.push(ValidationError::SecretKeyExposed);
    }
    check_url(&mut errors, "payments.script_url", &config.payments.script_url);
    if config.payments.minimum_minor == Some(0) {
        errors.push(ValidationError::Zero("payments.minimum_minor"));
    }
    if config.payments.max_open_sessions == 0 {
        errors.push(ValidationError::Zero("payments.max_open_sessions"));
    }

    if config.crypto.copied_indicator_ms == 0 {
        errors.push(ValidationError::Zero("crypto.copied_indicator_ms"));
    }
    for (asset, address) in &config.crypto.wallets {
        if address.trim().is_empty() {
            errors.push(ValidationError::EmptyWallet(*asset));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        }),
    }
}
