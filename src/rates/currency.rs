//! Currencies accepted by the hosted payment widget.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A settlement currency for the payment widget.
///
/// Each variant carries its own fallback exchange rate (local units per USD)
/// and the smallest charge the widget accepts, in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Nigerian naira (kobo).
    Ngn,
    /// Ghanaian cedi (pesewas).
    Ghs,
    /// Kenyan shilling (cents).
    Kes,
    /// South African rand (cents).
    Zar,
}

impl Currency {
    pub const ALL: [Currency; 4] = [Currency::Ngn, Currency::Ghs, Currency::Kes, Currency::Zar];

    /// ISO 4217 code, also the key used by the exchange-rate API.
    pub fn code(self) -> &'static str {
        match self {
            Currency::Ngn => "NGN",
            Currency::Ghs => "GHS",
            Currency::Kes => "KES",
            Currency::Zar => "ZAR",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Ngn => "₦",
            Currency::Ghs => "GH₵",
            Currency::Kes => "KSh",
            Currency::Zar => "R",
        }
    }

    /// Rate used when the live lookup fails.
    pub fn fallback_rate(self) -> u64 {
        match self {
            Currency::Ngn => 1500,
            Currency::Ghs => 15,
            Currency::Kes => 130,
            Currency::Zar => 18,
        }
    }

    /// Minimum charge in minor units.
    pub fn minimum_minor(self) -> u64 {
        match self {
            Currency::Ngn => 10_000, // ₦100
            Currency::Ghs => 100,
            Currency::Kes => 1_000,
            Currency::Zar => 100,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported currency: {0}")]
pub struct UnknownCurrency(pub String);

impl FromStr for Currency {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCurrency(s.to_string()))
    }
}
