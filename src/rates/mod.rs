//! Exchange rate subsystem.
//!
//! # Data Flow
//! ```text
//! amount change / submit
//!     → fetcher.rs (single lookup, fallback on any failure)
//!     → provider.rs (public rate API, or this service's rate endpoint)
//!     → ExchangeRate { value, is_fallback }
//! ```
//!
//! # Design Decisions
//! - Network errors are absorbed: the donor always gets a rate
//! - Rates are rounded to whole local units
//! - Per-currency fallback and minimum live on the `Currency` enum

pub mod currency;
pub mod fetcher;
pub mod provider;
pub mod types;

pub use currency::Currency;
pub use fetcher::RateFetcher;
pub use provider::{ExchangeRateApi, RateEndpointClient, RateSource};
pub use types::{ExchangeRate, Quote, RateError, RateRequest, RateResponse};
