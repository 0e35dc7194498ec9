//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → limits.rs (body size, request timeout)
//!     → handler
//!     → headers.rs (nosniff, frame, referrer headers)
//! ```

pub mod headers;
pub mod limits;

pub use headers::apply_security_headers;
pub use limits::apply_limits;
