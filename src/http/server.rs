//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build shared state (rate fetcher, widget relay, intent registry)
//! - Create the Axum router with all handlers
//! - Wire up middleware (request ID, tracing, limits, security headers, metrics)
//! - Serve until the shutdown broadcast fires

use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Json, Router,
};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::config::DonationConfig;
use crate::crypto::{options_from, CryptoOption};
use crate::donation::{CheckoutRelay, CheckoutSettings, FormController, IntentStatus, WidgetLoader};
use crate::http::request::apply_request_id;
use crate::http::{crypto, donations, rate};
use crate::observability::metrics;
use crate::rates::{Currency, ExchangeRateApi, RateError, RateFetcher};
use crate::security::{apply_limits, apply_security_headers};

/// Form controller as wired by the service.
pub type DonationForm = FormController<ExchangeRateApi, CheckoutRelay>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to build rate client: {0}")]
    Rates(#[from] RateError),

    #[error("failed to build widget loader: {0}")]
    Loader(#[from] reqwest::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DonationConfig>,
    pub rates: Arc<RateFetcher<ExchangeRateApi>>,
    pub relay: CheckoutRelay,
    pub intents: Arc<DashMap<Uuid, IntentStatus>>,
    pub crypto_options: Arc<Vec<CryptoOption>>,
}

impl AppState {
    pub fn new(config: DonationConfig) -> Result<Self, ServerError> {
        let timeout = Duration::from_secs(config.rates.timeout_secs);
        let currency = config.payments.currency;

        let api = ExchangeRateApi::new(&config.rates.api_base_url, timeout)?;
        let rates = RateFetcher::new(api, currency).with_fallback(config.rates.fallback_for(currency));

        let loader = WidgetLoader::new(&config.payments.script_url, config.payments.verify_script, timeout)?;
        let crypto_options = options_from(&config.crypto.wallets);

        Ok(Self {
            rates: Arc::new(rates),
            relay: CheckoutRelay::new(Arc::new(loader), config.payments.max_open_sessions),
            intents: Arc::new(DashMap::new()),
            crypto_options: Arc::new(crypto_options),
            config: Arc::new(config),
        })
    }

    /// A fresh form for one donation attempt.
    pub fn form(&self) -> DonationForm {
        FormController::new(
            self.rates.clone(),
            self.relay.clone(),
            CheckoutSettings {
                public_key: self.config.payments.public_key.clone(),
                minimum_minor: self.config.payments.effective_minimum(),
            },
        )
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.config.payments.intent_retention_secs)
    }
}

#[derive(Serialize)]
struct HealthStatus {
    version: &'static str,
    status: &'static str,
    currency: Currency,
    widget_loaded: bool,
    open_sessions: usize,
}

async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        currency: state.rates.currency(),
        widget_loaded: state.relay.loader().is_loaded(),
        open_sessions: state.relay.pending(),
    })
}

/// HTTP server for the donation service.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    pub fn new(config: DonationConfig) -> Result<Self, ServerError> {
        let state = AppState::new(config)?;
        let router = Self::build_router(&state);
        Ok(Self { router, state })
    }

    fn build_router(state: &AppState) -> Router {
        let config = &state.config.server;

        let api = Router::new()
            .route("/health", get(health))
            .route("/api/paystack-rate", post(rate::paystack_rate))
            .route("/api/donations", post(donations::create_donation))
            .route("/api/donations/{reference}", get(donations::get_donation))
            .route("/api/donations/{reference}/callback", post(donations::donation_callback))
            .route("/api/crypto-options", get(crypto::list_options))
            .route_layer(middleware::from_fn(metrics::track_requests))
            .with_state(state.clone());

        let router = apply_limits(api, config);
        let router = if config.security_headers {
            apply_security_headers(router)
        } else {
            router
        };
        apply_request_id(router)
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &DonationConfig {
        &self.state.config
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            currency = %self.state.config.payments.currency,
            crypto_options = self.state.crypto_options.len(),
            "HTTP server starting"
        );

        // Load the widget script once, up front.
        let loader_state = self.state.clone();
        tokio::spawn(async move {
            loader_state.relay.loader().ensure_loaded().await;
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::CryptoAsset;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn server(max_body_bytes: usize) -> HttpServer {
        let mut config = DonationConfig::default();
        config.payments.public_key = "pk_test_abc".to_string();
        config.payments.verify_script = false;
        config.rates.api_base_url = "http://127.0.0.1:9".to_string();
        config.server.max_body_bytes = max_body_bytes;
        config.crypto.wallets.insert(CryptoAsset::Eth, "0xabc".to_string());
        HttpServer::new(config).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_widget() {
        let server = server(1024);
        let response = server
            .router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        let body = json_body(response).await;
        assert_eq!(body["status"], "operational");
        assert_eq!(body["currency"], "NGN");
        assert_eq!(body["widget_loaded"], false);
        assert_eq!(body["open_sessions"], 0);
    }

    #[tokio::test]
    async fn test_crypto_options_route() {
        let response = server(1024)
            .router()
            .oneshot(Request::get("/api/crypto-options").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body = json_body(response).await;
        assert_eq!(body[0]["asset"], "eth");
        assert_eq!(body[0]["address"], "0xabc");
    }

    #[tokio::test]
    async fn test_malformed_rate_request() {
        let request = Request::post("/api/paystack-rate")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = server(1024).router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Invalid request body");
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let request = Request::post("/api/donations")
            .header("content-type", "application/json")
            .body(Body::from(format!(r#"{{"amount":"1","email":"{}"}}"#, "a".repeat(200))))
            .unwrap();
        let response = server(64).router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_unknown_donation() {
        let uri = format!("/api/donations/{}", Uuid::new_v4());
        let response = server(1024)
            .router()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["kind"], "not_found");
    }
}
