use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateQuote {
    pub rate: u64,
    #[serde(default)]
    pub fallback: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetSetup {
    pub public_key: String,
    pub email: String,
    /// Minor units of `currency`.
    pub amount: u64,
    pub currency: String,
    pub reference: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationCreated {
    pub setup: WidgetSetup,
    pub script_url: String,
    #[serde(default)]
    pub preview: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonationStatus {
    pub reference: String,
    pub state: String,
    pub amount: u64,
    pub currency: String,
    #[serde(default)]
    pub transaction: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CryptoOption {
    pub asset: String,
    pub label: String,
    pub address: String,
    pub network: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub currency: String,
    pub widget_loaded: bool,
    pub open_sessions: usize,
}

/// What the hosted widget reported back to the page.
#[derive(Debug, Clone)]
pub enum WidgetEvent {
    Success { transaction: String },
    Close,
}

pub struct DonationClient {
    client: Client,
    service_url: String,
}

impl DonationClient {
    pub fn new(service_url: &str) -> Self {
        Self {
            client: Client::new(),
            service_url: service_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn health(&self) -> Result<Health, Box<dyn std::error::Error>> {
        let resp = self
            .client
            .get(format!("{}/health", self.service_url))
            .send()
            .await?;
        decode(resp).await
    }

    /// Local-currency rate for a USD amount.
    pub async fn rate(&self, amount: f64) -> Result<RateQuote, Box<dyn std::error::Error>> {
        let resp = self
            .client
            .post(format!("{}/api/paystack-rate", self.service_url))
            .json(&json!({ "amount": amount }))
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn crypto_options(&self) -> Result<Vec<CryptoOption>, Box<dyn std::error::Error>> {
        let resp = self
            .client
            .get(format!("{}/api/crypto-options", self.service_url))
            .send()
            .await?;
        decode(resp).await
    }

    /// Submit the donation form. `amount` is sent as typed.
    pub async fn create_donation(
        &self,
        amount: &str,
        email: &str,
    ) -> Result<DonationCreated, Box<dyn std::error::Error>> {
        let resp = self
            .client
            .post(format!("{}/api/donations", self.service_url))
            .json(&json!({ "amount": amount, "email": email }))
            .send()
            .await?;
        decode(resp).await
    }

    /// Relay the widget's callback for `reference`.
    pub async fn report(
        &self,
        reference: &str,
        event: WidgetEvent,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let body = match event {
            WidgetEvent::Success { transaction } => json!({ "event": "success", "transaction": transaction }),
            WidgetEvent::Close => json!({ "event": "close" }),
        };
        let resp = self
            .client
            .post(format!("{}/api/donations/{}/callback", self.service_url, reference))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::ACCEPTED {
            let text = resp.text().await?;
            return Err(format!("Service returned error status {}: {}", status, text).into());
        }
        Ok(())
    }

    /// `None` once the donation is unknown or has expired.
    pub async fn status(&self, reference: &str) -> Result<Option<DonationStatus>, Box<dyn std::error::Error>> {
        let resp = self
            .client
            .get(format!("{}/api/donations/{}", self.service_url, reference))
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode(resp).await.map(Some)
    }

    /// Raw POST, for requests the typed helpers do not cover.
    pub async fn post_json(&self, path: &str, body: &Value) -> Result<Response, reqwest::Error> {
        self.client
            .post(format!("{}{}", self.service_url, path))
            .json(body)
            .send()
            .await
    }
}

async fn decode<T: for<'de> Deserialize<'de>>(resp: Response) -> Result<T, Box<dyn std::error::Error>> {
    let status = resp.status();
    let text = resp.text().await?;

    if !status.is_success() {
        return Err(format!("Service returned error status {}: {}", status, text).into());
    }

    match serde_json::from_str::<T>(&text) {
        Ok(value) => Ok(value),
        Err(e) => Err(e.into()),
    }
}
