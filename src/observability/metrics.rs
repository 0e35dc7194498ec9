//! Metrics collection and exposition.
//!
//! # Metrics
//! - `donation_http_requests_total` (counter): requests by method, route, status
//! - `donation_http_request_duration_seconds` (histogram): latency by route
//! - `donation_rate_lookups_total` (counter): lookups by source (live, fallback)
//! - `donation_intents_total` (counter): form outcomes (success, closed, rejected)
//! - `donation_clipboard_copies_total` (counter): copies by path (primary, fallback, failed)
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    metrics::counter!(
        "donation_http_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("donation_http_request_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_rate_lookup(source: &'static str) {
    metrics::counter!("donation_rate_lookups_total", "source" => source).increment(1);
}

pub fn record_intent(outcome: &'static str) {
    metrics::counter!("donation_intents_total", "outcome" => outcome).increment(1);
}

pub fn record_clipboard_copy(path: &'static str) {
    metrics::counter!("donation_clipboard_copies_total", "path" => path).increment(1);
}

/// Middleware recording request count and latency per matched route.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    record_request(&method, &route, response.status().as_u16(), start);
    response
}
