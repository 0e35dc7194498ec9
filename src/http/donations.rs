//! Donation endpoints.
//!
//! The page posts the form here, receives the widget setup, opens the
//! hosted widget itself, and relays the widget's callback back.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::donation::{
    FormState, IntentStatus, PaymentHandle, PendingPayment, RatePreview, WidgetOutcome, WidgetSetup,
};
use crate::http::error::ApiError;
use crate::http::server::{AppState, DonationForm};

#[derive(Debug, Deserialize)]
pub struct DonationRequest {
    /// Number or string, as typed into the form.
    #[serde(default)]
    pub amount: Value,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationCreated {
    pub setup: WidgetSetup,
    pub script_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<RatePreview>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallbackEvent {
    Success,
    Close,
}

#[derive(Debug, Deserialize)]
pub struct CallbackRequest {
    pub event: CallbackEvent,
    /// Widget transaction reference, on success.
    #[serde(default)]
    pub transaction: Option<String>,
}

fn amount_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

pub async fn create_donation(
    State(state): State<AppState>,
    Json(request): Json<DonationRequest>,
) -> Result<(StatusCode, Json<DonationCreated>), ApiError> {
    state.relay.loader().ensure_loaded().await;

    let mut form = state.form();
    form.set_amount(&amount_text(&request.amount)).await?;
    form.set_email(&request.email)?;

    let preview = if state.config.payments.show_preview {
        form.preview()
    } else {
        None
    };

    let PendingPayment { setup, handle } = form.submit().await?;

    state.intents.insert(
        setup.reference,
        IntentStatus {
            reference: setup.reference,
            state: FormState::AwaitingPayment,
            amount: setup.amount,
            currency: setup.currency,
            transaction: None,
        },
    );
    tokio::spawn(track_payment(state.clone(), form, handle));

    let created = DonationCreated {
        setup,
        script_url: state.relay.loader().script_url().to_string(),
        preview,
    };
    Ok((StatusCode::CREATED, Json(created)))
}

/// Own the form until the widget session ends, then keep the status
/// queryable for the retention period.
async fn track_payment(state: AppState, mut form: DonationForm, handle: PaymentHandle) {
    let reference = handle.reference();
    form.await_payment(handle).await;

    tokio::time::sleep(state.retention()).await;
    state.intents.remove(&reference);
}

pub async fn donation_callback(
    State(state): State<AppState>,
    Path(reference): Path<Uuid>,
    Json(request): Json<CallbackRequest>,
) -> Result<StatusCode, ApiError> {
    let outcome = match request.event {
        CallbackEvent::Success => WidgetOutcome::Success {
            transaction: request
                .transaction
                .unwrap_or_else(|| reference.to_string()),
        },
        CallbackEvent::Close => WidgetOutcome::Closed,
    };

    let settled = outcome.clone();
    if state.relay.resolve(&reference, outcome) {
        // The next status read already sees the outcome.
        if let Some(mut status) = state.intents.get_mut(&reference) {
            status.settle(&settled);
        }
        Ok(StatusCode::ACCEPTED)
    } else {
        tracing::warn!(reference = %reference, "Callback for unknown or settled donation");
        Err(ApiError::NotFound("Unknown or settled donation"))
    }
}

pub async fn get_donation(
    State(state): State<AppState>,
    Path(reference): Path<Uuid>,
) -> Result<Json<IntentStatus>, ApiError> {
    state
        .intents
        .get(&reference)
        .map(|status| Json(status.clone()))
        .ok_or(ApiError::NotFound("Donation not found"))
}
