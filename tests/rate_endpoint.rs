//! Rate endpoint behavior against a mock exchange-rate API.

use donation_sdk::DonationClient;
use donation_service::rates::{Currency, ExchangeRate, RateEndpointClient, RateFetcher};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::time::Duration;

mod common;

#[tokio::test]
async fn test_live_rate_is_rounded() {
    let upstream = common::start_rate_api(1532.6).await;
    let (url, shutdown) = common::start_service(common::test_config(upstream)).await;

    let quote = DonationClient::new(&url).rate(25.0).await.unwrap();
    assert_eq!(quote.rate, 1533);
    assert!(!quote.fallback);

    shutdown.trigger();
}

#[tokio::test]
async fn test_upstream_refusal_answers_fallback() {
    let upstream = common::start_programmable_backend(|| async { (503, "{}".to_string()) }).await;
    let (url, shutdown) = common::start_service(common::test_config(upstream)).await;

    let resp = DonationClient::new(&url)
        .post_json("/api/paystack-rate", &json!({ "amount": 10 }))
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "rate": 1500, "fallback": true }));

    shutdown.trigger();
}

#[tokio::test]
async fn test_missing_currency_answers_fallback() {
    let upstream = common::start_programmable_backend(|| async {
        (200, r#"{"rates":{"USD":1}}"#.to_string())
    })
    .await;
    let (url, shutdown) = common::start_service(common::test_config(upstream)).await;

    let quote = DonationClient::new(&url).rate(5.0).await.unwrap();
    assert_eq!(quote.rate, 1500);
    assert!(quote.fallback);

    shutdown.trigger();
}

#[tokio::test]
async fn test_missing_amount_rejected() {
    let upstream = common::start_rate_api(1500.0).await;
    let (url, shutdown) = common::start_service(common::test_config(upstream)).await;
    let client = DonationClient::new(&url);

    for body in [json!({}), json!({ "amount": 0 })] {
        let resp = client.post_json("/api/paystack-rate", &body).await.unwrap();
        assert_eq!(resp.status().as_u16(), 400);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"], "Missing amount field");
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_upstream_is_server_error() {
    let upstream = common::closed_port().await;
    let (url, shutdown) = common::start_service(common::test_config(upstream)).await;

    let resp = DonationClient::new(&url)
        .post_json("/api/paystack-rate", &json!({ "amount": 10 }))
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Server error");
    assert!(body["details"].is_string());

    shutdown.trigger();
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let upstream = common::start_rate_api(1500.0).await;
    let (url, shutdown) = common::start_service(common::test_config(upstream)).await;

    let resp = DonationClient::new(&url)
        .post_json("/api/paystack-rate", &json!({ "amount": 1 }))
        .await
        .unwrap();
    assert!(resp.headers().contains_key("x-request-id"));
    assert_eq!(resp.headers()["x-content-type-options"], "nosniff");

    shutdown.trigger();
}

#[tokio::test]
async fn test_endpoint_client_keeps_fallback_flag() {
    let upstream = common::start_programmable_backend(|| async { (503, "{}".to_string()) }).await;
    let (url, shutdown) = common::start_service(common::test_config(upstream)).await;

    let source = RateEndpointClient::new(&url, Duration::from_secs(2)).unwrap();
    // Local fallback differs so the service's own answer is recognisable.
    let fetcher = RateFetcher::new(source, Currency::Ngn).with_fallback(1400);
    assert_eq!(fetcher.fetch(Decimal::ONE).await, ExchangeRate::fallback(1500));

    shutdown.trigger();
}

#[tokio::test]
async fn test_endpoint_client_live_rate() {
    let upstream = common::start_rate_api(1532.6).await;
    let (url, shutdown) = common::start_service(common::test_config(upstream)).await;

    let source = RateEndpointClient::new(&url, Duration::from_secs(2)).unwrap();
    let fetcher = RateFetcher::new(source, Currency::Ngn);
    assert_eq!(fetcher.fetch(Decimal::ONE).await, ExchangeRate::live(1533));

    shutdown.trigger();
}

#[tokio::test]
async fn test_health_reports_service_currency() {
    let upstream = common::start_rate_api(1532.6).await;
    let mut config = common::test_config(upstream);
    config.payments.currency = Currency::Ghs;
    let (url, shutdown) = common::start_service(config).await;
    let client = DonationClient::new(&url);

    assert_eq!(client.health().await.unwrap().currency, "GHS");

    // The mock only quotes NGN, so a GHS service answers with the GHS fallback.
    let quote = client.rate(1.0).await.unwrap();
    assert_eq!(quote.rate, 15);
    assert!(quote.fallback);

    shutdown.trigger();
}
