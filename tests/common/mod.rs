//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use donation_service::config::DonationConfig;
use donation_service::crypto::CryptoAsset;
use donation_service::{HttpServer, Shutdown};

/// Start a programmable mock upstream on an ephemeral port.
///
/// Every request gets whatever `f` yields, as a JSON body.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;

                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Mock exchange-rate API answering every request with `rates.NGN = rate`.
pub async fn start_rate_api(rate: f64) -> SocketAddr {
    start_programmable_backend(move || async move {
        (200, format!(r#"{{"base":"USD","rates":{{"USD":1,"NGN":{}}}}}"#, rate))
    })
    .await
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Config pointing at `rate_api`, with the script check off.
pub fn test_config(rate_api: SocketAddr) -> DonationConfig {
    let mut config = DonationConfig::default();
    config.server.bind_address = "127.0.0.1:0".to_string();
    config.rates.api_base_url = format!("http://{}", rate_api);
    config.rates.timeout_secs = 2;
    config.payments.public_key = "pk_test_integration".to_string();
    config.payments.verify_script = false;
    config.crypto.wallets.insert(CryptoAsset::Btc, "bc1qintegration".to_string());
    config.crypto.wallets.insert(CryptoAsset::Usdt, "TXintegration".to_string());
    config
}

/// Run the service on an ephemeral port. Keep the `Shutdown` alive for the test.
pub async fn start_service(config: DonationConfig) -> (String, Shutdown) {
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    (format!("http://{}", addr), shutdown)
}
