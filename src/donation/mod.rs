//! Donation form subsystem.
//!
//! # Data Flow
//! ```text
//! amount/email input
//!     → controller.rs (validation, rate, minor units)
//!     → widget.rs (PaymentWidget::open → PaymentHandle)
//!     → relay.rs (service side: parked until the page reports the callback)
//!     → controller.rs (Success / Idle)
//! ```
//!
//! # Design Decisions
//! - Rate failures never reach the donor (fallback rate)
//! - Validation and integration errors carry the donor-facing message
//! - The widget script is loaded once per process (loader.rs)

pub mod controller;
pub mod loader;
pub mod relay;
pub mod types;
pub mod widget;

pub use controller::{CheckoutSettings, FormController, PendingPayment};
pub use loader::WidgetLoader;
pub use relay::CheckoutRelay;
pub use types::{DonationError, DonationIntent, ErrorKind, FormState, IntentStatus, RatePreview};
pub use widget::{PaymentHandle, PaymentWidget, WidgetOutcome, WidgetSetup};
