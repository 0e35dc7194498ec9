//! Crypto donation panel.

use std::time::Duration;
use tokio::time::Instant;

use crate::crypto::assets::{CryptoAsset, CryptoOption};
use crate::crypto::clipboard::{ClipboardBackend, ClipboardError};
use crate::observability::metrics;

/// Which backend performed a copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyPath {
    Primary,
    Fallback,
}

/// Wallet address list with copy-to-clipboard and a transient "copied" flag.
pub struct CryptoPanel<P, F> {
    options: Vec<CryptoOption>,
    primary: P,
    fallback: F,
    indicator: Duration,
    copied: Option<(CryptoAsset, Instant)>,
}

impl<P: ClipboardBackend, F: ClipboardBackend> CryptoPanel<P, F> {
    pub fn new(options: Vec<CryptoOption>, primary: P, fallback: F, indicator: Duration) -> Self {
        Self {
            options,
            primary,
            fallback,
            indicator,
            copied: None,
        }
    }

    pub fn options(&self) -> &[CryptoOption] {
        &self.options
    }

    pub fn option(&self, asset: CryptoAsset) -> Option<&CryptoOption> {
        self.options.iter().find(|o| o.asset == asset)
    }

    /// Copy the address for `asset`.
    ///
    /// Uses the primary clipboard when available and falls back otherwise, or
    /// when the primary fails. No retry.
    pub fn copy(&mut self, asset: CryptoAsset) -> Result<CopyPath, ClipboardError> {
        let address = self
            .option(asset)
            .map(|o| o.address.clone())
            .ok_or(ClipboardError::UnknownAsset(asset))?;

        let path = match self.copy_address(&address) {
            Ok(path) => path,
            Err(e) => {
                tracing::error!(asset = %asset, error = %e, "Copy to clipboard failed");
                metrics::record_clipboard_copy("failed");
                return Err(e);
            }
        };

        metrics::record_clipboard_copy(match path {
            CopyPath::Primary => "primary",
            CopyPath::Fallback => "fallback",
        });
        self.copied = Some((asset, Instant::now()));
        Ok(path)
    }

    fn copy_address(&mut self, address: &str) -> Result<CopyPath, ClipboardError> {
        if self.primary.is_available() {
            match self.primary.write_text(address) {
                Ok(()) => return Ok(CopyPath::Primary),
                Err(e) => {
                    tracing::warn!(backend = self.primary.name(), error = %e, "Primary clipboard failed, trying fallback");
                }
            }
        }

        if !self.fallback.is_available() {
            return Err(ClipboardError::Unavailable);
        }
        tracing::debug!(backend = self.fallback.name(), "Copying via fallback clipboard");
        self.fallback.write_text(address)?;
        Ok(CopyPath::Fallback)
    }

    /// Asset whose "copied" flag is still showing.
    pub fn copied(&self) -> Option<CryptoAsset> {
        self.copied
            .filter(|(_, at)| at.elapsed() < self.indicator)
            .map(|(asset, _)| asset)
    }

    pub fn is_copied(&self, asset: CryptoAsset) -> bool {
        self.copied() == Some(asset)
    }
}
