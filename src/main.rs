//! Donation service.
//!
//! Serves the donation page's backend: the local-currency rate endpoint,
//! donation intents handed to the hosted payment widget, and the crypto
//! wallet list.
//!
//! # Architecture Overview
//!
//! ```text
//!     Donation page                 ┌──────────────────────────────────────────┐
//!     ─────────────────────────────▶│  http (request id, trace, limits)        │
//!                                   │    ├─ /api/paystack-rate ──▶ rates       │──▶ exchange-rate API
//!                                   │    ├─ /api/donations ──────▶ donation    │
//!                                   │    │      (form controller, relay)       │
//!     widget callback ─────────────▶│    ├─ /api/donations/{ref}/callback      │
//!                                   │    └─ /api/crypto-options ─▶ crypto      │
//!                                   │                                          │
//!                                   │  config · observability · lifecycle      │
//!                                   └──────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use tokio::net::TcpListener;

use donation_service::config::{self, DonationConfig};
use donation_service::observability::{logging, metrics};
use donation_service::{HttpServer, Shutdown};

/// Path of an optional TOML config file.
const CONFIG_ENV: &str = "DONATION_CONFIG";

fn load() -> Result<DonationConfig, config::ConfigError> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) => config::load_config(&PathBuf::from(path)),
        None => config::load_default(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load()?;
    logging::init(&config.observability.log_level);

    tracing::info!("donation-service v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.server.bind_address,
        currency = %config.payments.currency,
        request_timeout_secs = config.server.request_timeout_secs,
        "Configuration loaded"
    );

    // Validation already checked the address.
    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
