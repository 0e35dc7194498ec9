//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional via DONATION_CONFIG)
//!     → loader.rs (parse & deserialize, PAYSTACK_PUBLIC_KEY override)
//!     → validation.rs (semantic checks)
//!     → DonationConfig (validated, immutable)
//!     → shared via Arc to handlers
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_default, ConfigError};
pub use schema::DonationConfig;
pub use schema::{CryptoConfig, ObservabilityConfig, PaymentsConfig, RatesConfig, ServerConfig};
