//! Configuration loading from disk and environment.

use std::env;
use std::fs;
use std::path::Path;

use crate::config::schema::DonationConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the widget public key.
pub const PUBLIC_KEY_ENV: &str = "PAYSTACK_PUBLIC_KEY";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load a TOML file, apply environment overrides, and validate.
pub fn load_config(path: &Path) -> Result<DonationConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let mut config: DonationConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;
    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    tracing::debug!(path = %path.display(), "Configuration file loaded");
    Ok(config)
}

/// Defaults plus environment overrides, validated.
pub fn load_default() -> Result<DonationConfig, ConfigError> {
    let mut config = DonationConfig::default();
    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Parse and validate TOML without consulting the environment.
pub fn parse_config(content: &str) -> Result<DonationConfig, ConfigError> {
    let config: DonationConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// The public key is read once, here, at initialization.
pub fn apply_env_overrides(config: &mut DonationConfig) {
    if let Ok(key) = env::var(PUBLIC_KEY_ENV) {
        if !key.trim().is_empty() {
            config.payments.public_key = key.trim().to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::CryptoAsset;
    use crate::rates::Currency;

    #[test]
    fn test_minimal_file() {
        let config = parse_config("[payments]\npublic_key = \"pk_test_abc\"\n").unwrap();
        assert_eq!(config.payments.currency, Currency::Ngn);
        assert_eq!(config.payments.effective_minimum(), 10_000);
        assert_eq!(config.rates.fallback_for(Currency::Ngn), 1500);
        assert!(!config.payments.show_preview);
        assert_eq!(config.crypto.copied_indicator_ms, 2000);
    }

    #[test]
    fn test_full_file() {
        let toml = r#"
            [server]
            bind_address = "127.0.0.1:4000"

            [rates]
            api_base_url = "http://rates.internal/v4"
            fallback_rate = 1600

            [payments]
            public_key = "pk_live_xyz"
            currency = "GHS"
            minimum_minor = 500
            show_preview = true

            [crypto.wallets]
            btc = "bc1qexample"
            usdt = "TXexample"
        "#;
        let config = parse_config(toml).unwrap();
        assert_eq!(config.server.bind_address, "127.0.0.1:4000");
        assert_eq!(config.rates.fallback_for(Currency::Ghs), 1600);
        assert_eq!(config.payments.currency, Currency::Ghs);
        assert_eq!(config.payments.effective_minimum(), 500);
        assert_eq!(config.crypto.wallets[&CryptoAsset::Usdt], "TXexample");
    }

    #[test]
    fn test_unknown_currency_is_parse_error() {
        let err = parse_config("[payments]\npublic_key = \"pk\"\ncurrency = \"EUR\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_errors_listed() {
        let err = parse_config("[server]\nrequest_timeout_secs = 0\n").unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Validation failed: "));
        assert!(message.contains("server.request_timeout_secs must be greater than zero"));
        assert!(message.contains("payments.public_key is empty"));
    }
}
