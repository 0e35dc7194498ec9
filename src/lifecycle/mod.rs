//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Init logging/metrics → Bind listener → Serve
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     SIGTERM/SIGINT → broadcast → stop accepting → drain in-flight requests
//! ```
//!
//! Open payment widget sessions are not persisted; they end with the process.

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
