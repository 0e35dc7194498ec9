//! Rate sources.
//!
//! # Responsibilities
//! - Query a USD → local currency rate over HTTP
//! - Classify failures (transport, status, decode, missing field)
//!
//! Sources never apply the fallback themselves; that policy belongs to
//! [`RateFetcher`](crate::rates::fetcher::RateFetcher).

use reqwest::Client;
use rust_decimal::Decimal;
use std::future::Future;
use std::time::Duration;

use crate::rates::currency::Currency;
use crate::rates::types::{Quote, RateError, RateRequest, RateResponse, RateResult, UpstreamRates};

/// Something that can quote a USD → `currency` rate for a donation amount.
pub trait RateSource: Send + Sync {
    fn lookup(
        &self,
        amount: Decimal,
        currency: Currency,
    ) -> impl Future<Output = RateResult<Quote>> + Send;
}

fn build_client(timeout: Duration) -> RateResult<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| RateError::Transport(e.to_string()))
}

/// The public exchange-rate API (`GET {base}/latest/USD`).
#[derive(Clone)]
pub struct ExchangeRateApi {
    client: Client,
    base_url: String,
}

impl ExchangeRateApi {
    pub fn new(base_url: &str, timeout: Duration) -> RateResult<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl RateSource for ExchangeRateApi {
    async fn lookup(&self, _amount: Decimal, currency: Currency) -> RateResult<Quote> {
        let url = format!("{}/latest/USD", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RateError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RateError::Status(status.as_u16()));
        }

        let body: UpstreamRates = response
            .json()
            .await
            .map_err(|e| RateError::Decode(e.to_string()))?;

        body.rates
            .get(currency.code())
            .copied()
            .filter(|rate| rate.is_finite() && *rate > 0.0)
            .map(Quote::live)
            .ok_or(RateError::Missing(currency))
    }
}

/// Client for this service's own rate endpoint (`POST /api/paystack-rate`).
///
/// The endpoint quotes in the service's configured currency; `currency` only
/// labels a missing-rate error. A fallback answer keeps its flag.
#[derive(Clone)]
pub struct RateEndpointClient {
    client: Client,
    endpoint: String,
}

impl RateEndpointClient {
    pub fn new(service_url: &str, timeout: Duration) -> RateResult<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: format!("{}/api/paystack-rate", service_url.trim_end_matches('/')),
        })
    }
}

impl RateSource for RateEndpointClient {
    async fn lookup(&self, amount: Decimal, currency: Currency) -> RateResult<Quote> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&RateRequest { amount: Some(amount) })
            .send()
            .await
            .map_err(|e| RateError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RateError::Status(status.as_u16()));
        }

        let body: RateResponse = response
            .json()
            .await
            .map_err(|e| RateError::Decode(e.to_string()))?;

        if body.rate == 0 {
            return Err(RateError::Missing(currency));
        }
        let raw = body.rate as f64;
        Ok(if body.fallback {
            Quote::fallback(raw)
        } else {
            Quote::live(raw)
        })
    }
}
