//! Rate endpoint (`POST /api/paystack-rate`).

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::http::server::AppState;
use crate::rates::types::{RateErrorBody, RateRequest, RateResponse};
use crate::rates::{ExchangeRate, RateError, RateSource};

fn error_body(status: StatusCode, error: &str, details: Option<String>) -> Response {
    let body = RateErrorBody {
        error: error.to_string(),
        details,
    };
    (status, Json(body)).into_response()
}

fn rate_body(rate: ExchangeRate) -> Response {
    (StatusCode::OK, Json(RateResponse::from(rate))).into_response()
}

/// Quote the USD → local rate for an amount.
///
/// Upstream refusals and missing rates answer with the fallback rate and
/// `"fallback": true`. Transport and decoding failures answer 500.
pub async fn paystack_rate(
    State(state): State<AppState>,
    payload: Result<Json<RateRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return error_body(
                StatusCode::BAD_REQUEST,
                "Invalid request body",
                Some(rejection.body_text()),
            )
        }
    };

    let amount = match request.amount {
        Some(amount) if !amount.is_zero() => amount,
        _ => return error_body(StatusCode::BAD_REQUEST, "Missing amount field", None),
    };

    let fetcher = &state.rates;
    match fetcher.source().lookup(amount, fetcher.currency()).await {
        Ok(quote) => rate_body(fetcher.settle(quote)),
        Err(e @ (RateError::Status(_) | RateError::Missing(_))) => rate_body(fetcher.fall_back(&e)),
        Err(e) => {
            tracing::error!(error = %e, "Rate lookup failed");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "Server error", Some(e.to_string()))
        }
    }
}
