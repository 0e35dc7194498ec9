//! Crypto donation panel subsystem.
//!
//! # Data Flow
//! ```text
//! crypto.wallets (config)
//!     → assets.rs (CryptoAsset table → CryptoOption rows)
//!     → panel.rs (copy selected address, transient "copied" flag)
//!     → clipboard.rs (platform utility, OSC 52 fallback)
//! ```

pub mod assets;
pub mod clipboard;
pub mod panel;

pub use assets::{options_from, CryptoAsset, CryptoOption};
pub use clipboard::{ClipboardBackend, ClipboardError, SystemClipboard, TerminalClipboard};
pub use panel::{CopyPath, CryptoPanel};
