//! One-time widget script loading.
//!
//! The widget script is loaded once per process. Every caller of
//! [`WidgetLoader::ensure_loaded`] shares that single attempt, including
//! concurrent ones, and a failed attempt is not repeated.

use reqwest::Client;
use std::time::Duration;
use tokio::sync::OnceCell;

pub struct WidgetLoader {
    script_url: String,
    verify: bool,
    client: Client,
    loaded: OnceCell<bool>,
}

impl WidgetLoader {
    /// `verify = false` marks the script loaded without any network I/O.
    pub fn new(script_url: &str, verify: bool, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            script_url: script_url.to_string(),
            verify,
            client: Client::builder().timeout(timeout).build()?,
            loaded: OnceCell::new(),
        })
    }

    pub fn script_url(&self) -> &str {
        &self.script_url
    }

    /// Load the script if that has not been attempted yet.
    pub async fn ensure_loaded(&self) -> bool {
        *self.loaded.get_or_init(|| self.load()).await
    }

    /// Result of the load attempt; false until one has completed.
    pub fn is_loaded(&self) -> bool {
        self.loaded.get().copied().unwrap_or(false)
    }

    async fn load(&self) -> bool {
        if !self.verify {
            tracing::info!(script_url = %self.script_url, "Widget script marked loaded (verification disabled)");
            return true;
        }

        match self.client.get(&self.script_url).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::info!(script_url = %self.script_url, "Widget script loaded");
                true
            }
            Ok(response) => {
                tracing::error!(
                    script_url = %self.script_url,
                    status = %response.status(),
                    "Widget script failed to load"
                );
                false
            }
            Err(e) => {
                tracing::error!(script_url = %self.script_url, error = %e, "Widget script failed to load");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    async fn serve_script(hits: Arc<AtomicUsize>) -> String {
        let app = Router::new().route(
            "/inline.js",
            get(move || {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    "window.PaystackPop = {};"
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/inline.js", addr)
    }

    #[tokio::test]
    async fn test_loads_once() {
        let hits = Arc::new(AtomicUsize::new(0));
        let url = serve_script(hits.clone()).await;
        let loader = Arc::new(WidgetLoader::new(&url, true, Duration::from_secs(5)).unwrap());

        assert!(!loader.is_loaded());
        let (a, b) = tokio::join!(loader.ensure_loaded(), loader.ensure_loaded());
        assert!(a && b);
        assert!(loader.ensure_loaded().await);
        assert!(loader.is_loaded());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unreachable_script_stays_unloaded() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/inline.js", listener.local_addr().unwrap());
        drop(listener);

        let loader = WidgetLoader::new(&url, true, Duration::from_secs(2)).unwrap();
        assert!(!loader.ensure_loaded().await);
        assert!(!loader.is_loaded());
    }

    #[tokio::test]
    async fn test_unverified_script_counts_as_loaded() {
        let loader = WidgetLoader::new("http://127.0.0.1:9/inline.js", false, Duration::from_secs(1)).unwrap();
        assert!(loader.ensure_loaded().await);
    }
}
