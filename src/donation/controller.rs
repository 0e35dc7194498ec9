//! Donation form controller.
//!
//! # State Transitions
//! ```text
//! Idle/Error/Success → Validating: submit
//! Validating → Error: bad amount or email
//! Validating → AwaitingRate: no rate resolved for the current amount
//! AwaitingRate → AwaitingPayment: rate (live or fallback) obtained
//! AwaitingPayment → Error: below currency minimum, or widget not loaded
//! AwaitingPayment → Success: widget success callback
//! AwaitingPayment → Idle: widget closed
//! ```
//!
//! Changing the amount drops the cached rate and prefetches a new one, so a
//! submit right after an amount change reuses that rate instead of fetching
//! twice.

use std::sync::Arc;
use uuid::Uuid;

use crate::donation::types::{
    parse_decimal, DonationError, DonationIntent, Email, FormState, RatePreview, UsdAmount,
};
use crate::donation::widget::{PaymentHandle, PaymentWidget, WidgetOutcome, WidgetSetup};
use crate::observability::metrics;
use crate::rates::{ExchangeRate, RateFetcher, RateSource};

/// Merchant settings the controller needs to open the widget.
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    pub public_key: String,
    /// Smallest charge in minor units.
    pub minimum_minor: u64,
}

/// A submitted donation and its open widget session.
#[derive(Debug)]
pub struct PendingPayment {
    pub setup: WidgetSetup,
    pub handle: PaymentHandle,
}

pub struct FormController<S, W> {
    rates: Arc<RateFetcher<S>>,
    widget: W,
    settings: CheckoutSettings,
    state: FormState,
    amount: String,
    email: String,
    rate: Option<ExchangeRate>,
    error: Option<DonationError>,
    intent: Option<DonationIntent>,
}

impl<S: RateSource, W: PaymentWidget> FormController<S, W> {
    pub fn new(rates: Arc<RateFetcher<S>>, widget: W, settings: CheckoutSettings) -> Self {
        Self {
            rates,
            widget,
            settings,
            state: FormState::Idle,
            amount: String::new(),
            email: String::new(),
            rate: None,
            error: None,
            intent: None,
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Message currently shown on the form.
    pub fn error(&self) -> Option<&DonationError> {
        self.error.as_ref()
    }

    pub fn rate(&self) -> Option<ExchangeRate> {
        self.rate
    }

    pub fn intent(&self) -> Option<&DonationIntent> {
        self.intent.as_ref()
    }

    /// Amount input changed. Prefetches a rate when the input is a positive number.
    pub async fn set_amount(&mut self, input: &str) -> Result<Option<ExchangeRate>, DonationError> {
        if self.is_loading() {
            return Err(DonationError::InProgress);
        }
        self.amount = input.to_string();
        self.rate = None;

        match parse_decimal(input) {
            Some(amount) if amount.is_sign_positive() && !amount.is_zero() => {
                let rate = self.rates.fetch(amount).await;
                self.rate = Some(rate);
                Ok(Some(rate))
            }
            _ => Ok(None),
        }
    }

    pub fn set_email(&mut self, input: &str) -> Result<(), DonationError> {
        if self.is_loading() {
            return Err(DonationError::InProgress);
        }
        self.email = input.to_string();
        Ok(())
    }

    /// Local-currency charge for the current amount, once a rate is known.
    pub fn preview(&self) -> Option<RatePreview> {
        let rate = self.rate?;
        let amount = parse_decimal(&self.amount).filter(|a| a.is_sign_positive() && !a.is_zero())?;
        let local_amount = amount.checked_mul(rate.value.into())?.round_dp(2);
        Some(RatePreview {
            local_amount,
            rate: rate.value,
            currency: self.rates.currency(),
            is_fallback: rate.is_fallback,
        })
    }

    /// Validate, resolve a rate, and open the payment widget.
    pub async fn submit(&mut self) -> Result<PendingPayment, DonationError> {
        if self.is_loading() {
            return Err(DonationError::InProgress);
        }
        self.error = None;
        self.state = FormState::Validating;

        let amount = match UsdAmount::parse(&self.amount) {
            Ok(amount) => amount,
            Err(e) => return Err(self.fail(e)),
        };
        let email = match Email::parse(&self.email) {
            Ok(email) => email,
            Err(e) => return Err(self.fail(e)),
        };

        let rate = match self.rate {
            Some(rate) => rate,
            None => {
                self.state = FormState::AwaitingRate;
                let rate = self.rates.fetch(amount.value()).await;
                self.rate = Some(rate);
                rate
            }
        };

        self.state = FormState::AwaitingPayment;
        let currency = self.rates.currency();

        let amount_minor = match amount.to_minor_units(rate.value) {
            Some(minor) => minor,
            None => return Err(self.fail(DonationError::InvalidAmount)),
        };
        if amount_minor < self.settings.minimum_minor {
            let err = DonationError::below_minimum(currency, self.settings.minimum_minor, rate);
            return Err(self.fail(err));
        }
        if !self.widget.is_loaded() {
            return Err(self.fail(DonationError::WidgetNotLoaded));
        }

        let setup = WidgetSetup {
            public_key: self.settings.public_key.clone(),
            email: email.as_str().to_string(),
            amount: amount_minor,
            currency,
            reference: Uuid::new_v4(),
        };
        let handle = match self.widget.open(&setup) {
            Ok(handle) => handle,
            Err(e) => return Err(self.fail(e)),
        };

        tracing::info!(
            reference = %setup.reference,
            amount_usd = %amount.value(),
            amount_minor,
            currency = %currency,
            rate = rate.value,
            fallback_rate = rate.is_fallback,
            "Payment widget opened"
        );

        self.intent = Some(DonationIntent {
            reference: setup.reference,
            amount_usd: amount.value(),
            email,
            amount_minor,
            currency,
            rate,
        });
        Ok(PendingPayment { setup, handle })
    }

    /// Apply the widget's callback. Ignored outside `AwaitingPayment`.
    pub fn complete(&mut self, outcome: WidgetOutcome) -> FormState {
        if self.state != FormState::AwaitingPayment {
            tracing::warn!(state = ?self.state, "Widget callback outside a payment session ignored");
            return self.state;
        }

        let reference = self.intent.take().map(|intent| intent.reference);
        self.state = outcome.final_state();
        match outcome {
            WidgetOutcome::Success { transaction } => {
                tracing::info!(reference = ?reference, transaction = %transaction, "Donation completed");
                metrics::record_intent("success");
            }
            WidgetOutcome::Closed => {
                tracing::info!(reference = ?reference, "Payment widget closed");
                metrics::record_intent("closed");
            }
        }
        self.state
    }

    /// Wait for the widget session to end and apply its outcome.
    pub async fn await_payment(&mut self, handle: PaymentHandle) -> FormState {
        let outcome = handle.outcome().await;
        self.complete(outcome)
    }

    fn fail(&mut self, error: DonationError) -> DonationError {
        tracing::debug!(kind = ?error.kind(), error = %error, "Donation rejected");
        metrics::record_intent("rejected");
        self.state = FormState::Error;
        self.error = Some(error.clone());
        error
    }
}
