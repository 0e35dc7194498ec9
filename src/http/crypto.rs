//! Crypto option listing (`GET /api/crypto-options`).

use axum::{extract::State, Json};

use crate::crypto::CryptoOption;
use crate::http::server::AppState;

pub async fn list_options(State(state): State<AppState>) -> Json<Vec<CryptoOption>> {
    Json(state.crypto_options.as_ref().clone())
}
