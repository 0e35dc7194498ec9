//! Donation form types and error definitions.

use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;
use uuid::Uuid;

use crate::donation::widget::WidgetOutcome;
use crate::rates::{Currency, ExchangeRate};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles"));

/// Smallest accepted donation: $0.01.
pub const MIN_USD: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Form controller states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormState {
    Idle,
    Validating,
    AwaitingRate,
    AwaitingPayment,
    Success,
    Error,
}

impl FormState {
    /// The form is busy and ignores input.
    pub fn is_loading(self) -> bool {
        matches!(
            self,
            FormState::Validating | FormState::AwaitingRate | FormState::AwaitingPayment
        )
    }
}

/// Which family an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Donor input problem; correct and resubmit.
    Validation,
    /// Payment widget problem; blocks the flow.
    Integration,
    /// Action not allowed in the current state.
    State,
}

/// Donor-visible errors. Messages are shown as-is on the form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DonationError {
    #[error("Please enter an amount greater than $0.01.")]
    InvalidAmount,

    #[error("Please enter your email address so we can complete your donation.")]
    InvalidEmail,

    #[error("Minimum donation is {symbol}{minimum} (about ${usd_equivalent}). Please increase your amount.")]
    BelowMinimum {
        symbol: &'static str,
        minimum: Decimal,
        usd_equivalent: Decimal,
    },

    #[error("Paystack script not loaded.")]
    WidgetNotLoaded,

    #[error("Payment widget rejected the request: {0}")]
    WidgetRejected(String),

    #[error("Too many donations are in progress. Please try again shortly.")]
    SessionsFull,

    #[error("A donation is already in progress.")]
    InProgress,
}

impl DonationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DonationError::InvalidAmount
            | DonationError::InvalidEmail
            | DonationError::BelowMinimum { .. } => ErrorKind::Validation,
            DonationError::WidgetNotLoaded
            | DonationError::WidgetRejected(_)
            | DonationError::SessionsFull => ErrorKind::Integration,
            DonationError::InProgress => ErrorKind::State,
        }
    }

    /// Build the minimum-amount error for a currency floor at a given rate.
    pub fn below_minimum(currency: Currency, minimum_minor: u64, rate: ExchangeRate) -> Self {
        let minimum = Decimal::from(minimum_minor) / Decimal::ONE_HUNDRED;
        let usd_equivalent = if rate.value == 0 {
            Decimal::ZERO
        } else {
            (minimum / Decimal::from(rate.value))
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        };
        DonationError::BelowMinimum {
            symbol: currency.symbol(),
            minimum: minimum.normalize(),
            usd_equivalent,
        }
    }
}

/// A validated USD donation amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsdAmount(Decimal);

impl UsdAmount {
    pub fn parse(input: &str) -> Result<Self, DonationError> {
        let value = parse_decimal(input).ok_or(DonationError::InvalidAmount)?;
        if value < MIN_USD {
            return Err(DonationError::InvalidAmount);
        }
        Ok(Self(value))
    }

    pub fn value(self) -> Decimal {
        self.0
    }

    /// `round(amount × rate × 100)`; `None` on overflow.
    pub fn to_minor_units(self, rate: u64) -> Option<u64> {
        self.0
            .checked_mul(Decimal::from(rate))?
            .checked_mul(Decimal::ONE_HUNDRED)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u64()
    }
}

/// Parse a form amount, accepting plain and scientific notation.
pub fn parse_decimal(input: &str) -> Option<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// A donor email address that passes the simple pattern check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    pub fn parse(input: &str) -> Result<Self, DonationError> {
        if EMAIL_PATTERN.is_match(input) {
            Ok(Self(input.to_string()))
        } else {
            Err(DonationError::InvalidEmail)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A submitted donation waiting on the payment widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationIntent {
    pub reference: Uuid,
    pub amount_usd: Decimal,
    pub email: Email,
    pub amount_minor: u64,
    pub currency: Currency,
    pub rate: ExchangeRate,
}

/// What the donor would be charged in local currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatePreview {
    /// Major units, two decimals.
    pub local_amount: Decimal,
    pub rate: u64,
    pub currency: Currency,
    pub is_fallback: bool,
}

/// Public view of an intent, kept briefly after the widget session ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntentStatus {
    pub reference: Uuid,
    pub state: FormState,
    pub amount: u64,
    pub currency: Currency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction: Option<String>,
}

impl IntentStatus {
    pub fn settle(&mut self, outcome: &WidgetOutcome) {
        self.state = outcome.final_state();
        self.transaction = outcome.transaction().map(str::to_string);
    }
}
