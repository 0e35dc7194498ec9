//! Crypto donation options.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Assets the crypto panel can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CryptoAsset {
    Btc,
    Eth,
    Usdt,
    Sol,
}

impl CryptoAsset {
    /// Display order on the panel.
    pub const ALL: [CryptoAsset; 4] = [
        CryptoAsset::Btc,
        CryptoAsset::Eth,
        CryptoAsset::Usdt,
        CryptoAsset::Sol,
    ];

    pub fn ticker(self) -> &'static str {
        match self {
            CryptoAsset::Btc => "BTC",
            CryptoAsset::Eth => "ETH",
            CryptoAsset::Usdt => "USDT",
            CryptoAsset::Sol => "SOL",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CryptoAsset::Btc => "Bitcoin (BTC)",
            CryptoAsset::Eth => "Ethereum (ETH)",
            CryptoAsset::Usdt => "Tether (USDT)",
            CryptoAsset::Sol => "Solana (SOL)",
        }
    }

    pub fn network(self) -> &'static str {
        match self {
            CryptoAsset::Btc => "Bitcoin",
            CryptoAsset::Eth => "Ethereum (ERC-20)",
            CryptoAsset::Usdt => "TRON (TRC-20)",
            CryptoAsset::Sol => "Solana",
        }
    }
}

impl fmt::Display for CryptoAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ticker())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown crypto asset: {0}")]
pub struct UnknownAsset(pub String);

impl FromStr for CryptoAsset {
    type Err = UnknownAsset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CryptoAsset::ALL
            .into_iter()
            .find(|a| a.ticker().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownAsset(s.to_string()))
    }
}

/// One row of the crypto panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoOption {
    pub asset: CryptoAsset,
    pub label: String,
    pub address: String,
    pub network: String,
}

impl CryptoOption {
    pub fn new(asset: CryptoAsset, address: &str) -> Self {
        Self {
            asset,
            label: asset.label().to_string(),
            address: address.to_string(),
            network: asset.network().to_string(),
        }
    }
}

/// Panel rows for the configured wallets, in display order.
pub fn options_from(wallets: &BTreeMap<CryptoAsset, String>) -> Vec<CryptoOption> {
    CryptoAsset::ALL
        .into_iter()
        .filter_map(|asset| {
            wallets
                .get(&asset)
                .map(|address| address.trim())
                .filter(|address| !address.is_empty())
                .map(|address| CryptoOption::new(asset, address))
        })
        .collect()
}
