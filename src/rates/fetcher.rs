//! Best-effort rate resolution.

use rust_decimal::Decimal;

use crate::observability::metrics;
use crate::rates::currency::Currency;
use crate::rates::provider::RateSource;
use crate::rates::types::{round_rate, ExchangeRate, Quote, RateError};

/// Resolves a rate for a donation amount and always produces an answer.
///
/// One lookup per call, no retries. Any failure yields the fallback rate
/// for the configured currency.
pub struct RateFetcher<S> {
    source: S,
    currency: Currency,
    fallback: u64,
}

impl<S: RateSource> RateFetcher<S> {
    pub fn new(source: S, currency: Currency) -> Self {
        Self {
            source,
            currency,
            fallback: currency.fallback_rate(),
        }
    }

    /// Override the currency's built-in fallback rate.
    pub fn with_fallback(mut self, rate: u64) -> Self {
        self.fallback = rate;
        self
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn fallback_rate(&self) -> ExchangeRate {
        ExchangeRate::fallback(self.fallback)
    }

    pub async fn fetch(&self, amount: Decimal) -> ExchangeRate {
        match self.source.lookup(amount, self.currency).await {
            Ok(quote) => self.settle(quote),
            Err(e) => self.fall_back(&e),
        }
    }

    /// Round a source's quote, keeping its fallback flag. Unusable values
    /// yield this fetcher's fallback.
    pub fn settle(&self, quote: Quote) -> ExchangeRate {
        let Some(value) = round_rate(quote.raw) else {
            tracing::warn!(currency = %self.currency, raw = quote.raw, "Unusable rate, using fallback");
            metrics::record_rate_lookup("fallback");
            return self.fallback_rate();
        };

        if quote.is_fallback {
            tracing::debug!(currency = %self.currency, rate = value, "Source answered with its fallback rate");
            metrics::record_rate_lookup("fallback");
            ExchangeRate::fallback(value)
        } else {
            tracing::debug!(currency = %self.currency, rate = value, "Rate resolved");
            metrics::record_rate_lookup("live");
            ExchangeRate::live(value)
        }
    }

    /// Fallback rate after a failed lookup.
    pub fn fall_back(&self, error: &RateError) -> ExchangeRate {
        tracing::warn!(
            currency = %self.currency,
            error = %error,
            fallback = self.fallback,
            "Rate lookup failed, using fallback"
        );
        metrics::record_rate_lookup("fallback");
        self.fallback_rate()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::rates::types::RateResult;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Scripted source that counts lookups.
    pub(crate) struct StubSource {
        pub rate: Option<f64>,
        pub is_fallback: bool,
        pub calls: Arc<AtomicUsize>,
    }

    impl StubSource {
        pub(crate) fn fixed(rate: f64) -> Self {
            Self {
                rate: Some(rate),
                is_fallback: false,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                rate: None,
                is_fallback: false,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Answers like a rate endpoint that already fell back.
        pub(crate) fn upstream_fallback(rate: f64) -> Self {
            Self {
                is_fallback: true,
                ..Self::fixed(rate)
            }
        }
    }

    impl RateSource for StubSource {
        async fn lookup(&self, _amount: Decimal, _currency: Currency) -> RateResult<Quote> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let raw = self.rate.ok_or_else(|| RateError::Transport("connection refused".into()))?;
            Ok(if self.is_fallback {
                Quote::fallback(raw)
            } else {
                Quote::live(raw)
            })
        }
    }

    #[tokio::test]
    async fn test_live_rate_is_rounded() {
        let fetcher = RateFetcher::new(StubSource::fixed(1532.6), Currency::Ngn);
        let rate = fetcher.fetch(Decimal::ONE).await;
        assert_eq!(rate, ExchangeRate::live(1533));
    }

    #[tokio::test]
    async fn test_failure_yields_fallback_without_retry() {
        let source = StubSource::failing();
        let calls = source.calls.clone();
        let fetcher = RateFetcher::new(source, Currency::Ngn);

        let rate = fetcher.fetch(Decimal::ONE).await;
        assert_eq!(rate, ExchangeRate::fallback(1500));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unusable_rate_yields_fallback() {
        let fetcher = RateFetcher::new(StubSource::fixed(0.0), Currency::Ngn);
        assert!(fetcher.fetch(Decimal::ONE).await.is_fallback);
    }

    #[tokio::test]
    async fn test_fallback_override() {
        let fetcher = RateFetcher::new(StubSource::failing(), Currency::Ngn).with_fallback(1600);
        assert_eq!(fetcher.fetch(Decimal::ONE).await, ExchangeRate::fallback(1600));
    }

    #[tokio::test]
    async fn test_source_fallback_flag_is_kept() {
        let fetcher = RateFetcher::new(StubSource::upstream_fallback(1500.0), Currency::Ngn).with_fallback(1400);
        assert_eq!(fetcher.fetch(Decimal::ONE).await, ExchangeRate::fallback(1500));
    }

    #[test]
    fn test_settle_unusable_quote() {
        let fetcher = RateFetcher::new(StubSource::failing(), Currency::Ngn);
        assert_eq!(fetcher.settle(Quote::live(f64::NAN)), ExchangeRate::fallback(1500));
        assert_eq!(fetcher.settle(Quote::live(1480.2)), ExchangeRate::live(1480));
    }
}
