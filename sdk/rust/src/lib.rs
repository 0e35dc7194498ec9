//! Client for the donation service HTTP API.

pub mod client;

pub use client::{
    CryptoOption, DonationClient, DonationCreated, DonationStatus, Health, RateQuote, WidgetEvent, WidgetSetup,
};
