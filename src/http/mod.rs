//! HTTP protocol handling subsystem.
//!
//! # Routes
//! ```text
//! GET  /health
//! POST /api/paystack-rate                     → rate.rs
//! POST /api/donations                         → donations.rs (form submit)
//! GET  /api/donations/{reference}             → donations.rs (status)
//! POST /api/donations/{reference}/callback    → donations.rs (widget callback)
//! GET  /api/crypto-options                    → crypto.rs
//! ```

pub mod crypto;
pub mod donations;
pub mod error;
pub mod rate;
pub mod request;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer, ServerError};
