//! Request limits.

use axum::Router;
use std::time::Duration;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer};

use crate::config::ServerConfig;

/// Cap body size and total request time.
#[allow(deprecated)]
pub fn apply_limits(router: Router, config: &ServerConfig) -> Router {
    router
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
}
