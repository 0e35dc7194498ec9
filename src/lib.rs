//! Donation service library.
//!
//! Domain logic for a single-page donation flow (USD amount converted to a
//! local currency and handed to a hosted payment widget) plus a crypto
//! donation panel, and the axum service that drives it.

pub mod config;
pub mod crypto;
pub mod donation;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod rates;
pub mod security;

pub use config::schema::DonationConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
