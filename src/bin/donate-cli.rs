use clap::{Parser, Subcommand};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use donation_service::config::CryptoConfig;
use donation_service::crypto::{CryptoAsset, CryptoOption, CryptoPanel, SystemClipboard, TerminalClipboard};
use donation_service::donation::types::UsdAmount;
use donation_service::rates::{Currency, RateEndpointClient, RateFetcher};

#[derive(Parser)]
#[command(name = "donate-cli")]
#[command(about = "Command-line client for the donation service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a USD amount at the service's current rate
    Rate { amount: String },
    /// Crypto wallet addresses
    Crypto {
        #[command(subcommand)]
        command: CryptoCommands,
    },
    /// Start a donation and print the widget setup
    Donate { amount: String, email: String },
    /// Show the state of a donation
    Status { reference: String },
}

#[derive(Subcommand)]
enum CryptoCommands {
    /// List wallet addresses
    List,
    /// Copy one wallet address to the clipboard
    Copy { asset: CryptoAsset },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Rate { amount } => {
            let amount = UsdAmount::parse(&amount)?;
            let currency = service_currency(&client, &cli.url).await?;
            let source = RateEndpointClient::new(&cli.url, Duration::from_secs(10))?;
            let rate = RateFetcher::new(source, currency).fetch(amount.value()).await;

            let local = amount
                .to_minor_units(rate.value)
                .map(|minor| minor as f64 / 100.0);
            let output = json!({
                "currency": currency,
                "rate": rate.value,
                "fallback": rate.is_fallback,
                "local_amount": local,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Crypto { command } => {
            let res = client
                .get(format!("{}/api/crypto-options", cli.url))
                .send()
                .await?;
            if !res.status().is_success() {
                return print_response(res).await;
            }
            let options: Vec<CryptoOption> = res.json().await?;

            match command {
                CryptoCommands::List => {
                    for option in &options {
                        println!("{:<22} {:<16} {}", option.label, option.network, option.address);
                    }
                }
                CryptoCommands::Copy { asset } => {
                    let mut panel = CryptoPanel::new(
                        options,
                        SystemClipboard::detect(),
                        TerminalClipboard::stdout(),
                        Duration::from_millis(CryptoConfig::default().copied_indicator_ms),
                    );
                    panel.copy(asset)?;
                    println!();
                    if let Some(option) = panel.option(asset) {
                        println!("Copied {} address: {}", option.label, option.address);
                    }
                }
            }
        }
        Commands::Donate { amount, email } => {
            let res = client
                .post(format!("{}/api/donations", cli.url))
                .json(&json!({ "amount": amount, "email": email }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Status { reference } => {
            let res = client
                .get(format!("{}/api/donations/{}", cli.url, reference))
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

#[derive(Deserialize)]
struct Health {
    currency: Currency,
}

/// The currency the service charges in; its rate endpoint quotes only that.
async fn service_currency(client: &reqwest::Client, url: &str) -> Result<Currency, Box<dyn std::error::Error>> {
    let res = client.get(format!("{}/health", url)).send().await?;
    if !res.status().is_success() {
        return Err(format!("donation service returned status {}", res.status()).into());
    }
    let health: Health = res.json().await?;
    Ok(health.currency)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: donation service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
