//! HTTP error mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::donation::{DonationError, ErrorKind};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Donation(#[from] DonationError),

    #[error("{0}")]
    NotFound(&'static str),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self {
            ApiError::Donation(e) => match e.kind() {
                ErrorKind::Validation => (StatusCode::UNPROCESSABLE_ENTITY, "validation"),
                ErrorKind::Integration => (StatusCode::SERVICE_UNAVAILABLE, "integration"),
                ErrorKind::State => (StatusCode::CONFLICT, "state"),
            },
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        };

        let body = ErrorBody {
            error: self.to_string(),
            kind,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_by_kind() {
        let cases = [
            (ApiError::Donation(DonationError::InvalidEmail), StatusCode::UNPROCESSABLE_ENTITY),
            (ApiError::Donation(DonationError::WidgetNotLoaded), StatusCode::SERVICE_UNAVAILABLE),
            (ApiError::Donation(DonationError::InProgress), StatusCode::CONFLICT),
            (ApiError::NotFound("Donation not found"), StatusCode::NOT_FOUND),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
