//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Every request carries an `x-request-id` (see `http::request`)
//! - Metrics are cheap when no exporter is installed
//! - Donor emails are never logged

pub mod logging;
pub mod metrics;
