//! Hosted payment widget seam.
//!
//! The widget itself is third-party and opaque. The form controller only
//! needs to know whether its script is loaded, how to open it, and how the
//! session ended.

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::donation::types::{DonationError, FormState};
use crate::rates::Currency;

/// Configuration handed to the widget when it opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetSetup {
    pub public_key: String,
    pub email: String,
    /// Charge in minor units.
    pub amount: u64,
    pub currency: Currency,
    pub reference: Uuid,
}

/// How a widget session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetOutcome {
    /// Payment completed; carries the widget's transaction reference.
    Success { transaction: String },
    /// Donor closed the widget.
    Closed,
}

impl WidgetOutcome {
    /// Form state once the session has ended this way.
    pub fn final_state(&self) -> FormState {
        match self {
            WidgetOutcome::Success { .. } => FormState::Success,
            WidgetOutcome::Closed => FormState::Idle,
        }
    }

    pub fn transaction(&self) -> Option<&str> {
        match self {
            WidgetOutcome::Success { transaction } => Some(transaction),
            WidgetOutcome::Closed => None,
        }
    }
}

/// Pending widget session. Resolves when the widget calls back.
///
/// There is no timeout. A handle whose sender is dropped resolves as
/// [`WidgetOutcome::Closed`].
#[derive(Debug)]
pub struct PaymentHandle {
    reference: Uuid,
    outcome: oneshot::Receiver<WidgetOutcome>,
}

impl PaymentHandle {
    pub fn new(reference: Uuid) -> (Self, oneshot::Sender<WidgetOutcome>) {
        let (tx, rx) = oneshot::channel();
        (Self { reference, outcome: rx }, tx)
    }

    pub fn reference(&self) -> Uuid {
        self.reference
    }

    pub async fn outcome(self) -> WidgetOutcome {
        self.outcome.await.unwrap_or(WidgetOutcome::Closed)
    }
}

/// A hosted payment widget.
pub trait PaymentWidget {
    /// Whether the widget script finished loading.
    fn is_loaded(&self) -> bool;

    /// Open the widget for `setup`.
    fn open(&self, setup: &WidgetSetup) -> Result<PaymentHandle, DonationError>;
}
