//! Widget implementation for the service.
//!
//! The page runs the real widget. The service parks each opened session
//! here, keyed by donation reference, until the page relays the widget's
//! success or close callback.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::donation::loader::WidgetLoader;
use crate::donation::types::DonationError;
use crate::donation::widget::{PaymentHandle, PaymentWidget, WidgetOutcome, WidgetSetup};

#[derive(Clone)]
pub struct CheckoutRelay {
    loader: Arc<WidgetLoader>,
    pending: Arc<DashMap<Uuid, oneshot::Sender<WidgetOutcome>>>,
    max_open: usize,
}

impl CheckoutRelay {
    /// At most `max_open` sessions wait on a callback at once.
    pub fn new(loader: Arc<WidgetLoader>, max_open: usize) -> Self {
        Self {
            loader,
            pending: Arc::new(DashMap::new()),
            max_open,
        }
    }

    pub fn loader(&self) -> &WidgetLoader {
        &self.loader
    }

    /// Deliver a widget callback. Returns false for unknown or settled references.
    pub fn resolve(&self, reference: &Uuid, outcome: WidgetOutcome) -> bool {
        match self.pending.remove(reference) {
            Some((_, tx)) => tx.send(outcome).is_ok(),
            None => false,
        }
    }

    /// Number of open widget sessions.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl PaymentWidget for CheckoutRelay {
    fn is_loaded(&self) -> bool {
        self.loader.is_loaded()
    }

    fn open(&self, setup: &WidgetSetup) -> Result<PaymentHandle, DonationError> {
        if self.pending.contains_key(&setup.reference) {
            return Err(DonationError::WidgetRejected(format!(
                "reference {} already open",
                setup.reference
            )));
        }
        if self.pending.len() >= self.max_open {
            tracing::warn!(open = self.pending.len(), max_open = self.max_open, "Widget session limit reached");
            return Err(DonationError::SessionsFull);
        }
        let (handle, tx) = PaymentHandle::new(setup.reference);
        self.pending.insert(setup.reference, tx);
        tracing::debug!(reference = %setup.reference, amount = setup.amount, "Widget session opened");
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::Currency;
    use std::time::Duration;

    fn relay() -> CheckoutRelay {
        let loader = WidgetLoader::new("http://127.0.0.1:9/inline.js", false, Duration::from_secs(1)).unwrap();
        CheckoutRelay::new(Arc::new(loader), 2)
    }

    fn setup(reference: Uuid) -> WidgetSetup {
        WidgetSetup {
            public_key: "pk_test_abc".into(),
            email: "donor@example.com".into(),
            amount: 150_000,
            currency: Currency::Ngn,
            reference,
        }
    }

    #[tokio::test]
    async fn test_resolve_settles_handle_once() {
        let relay = relay();
        let reference = Uuid::new_v4();
        let handle = relay.open(&setup(reference)).unwrap();
        assert_eq!(relay.pending(), 1);

        assert!(relay.resolve(&reference, WidgetOutcome::Closed));
        assert!(!relay.resolve(&reference, WidgetOutcome::Closed));
        assert_eq!(relay.pending(), 0);
        assert_eq!(handle.outcome().await, WidgetOutcome::Closed);
    }

    #[tokio::test]
    async fn test_loaded_follows_loader() {
        let relay = relay();
        assert!(!relay.is_loaded());
        relay.loader().ensure_loaded().await;
        assert!(relay.is_loaded());
    }

    #[test]
    fn test_duplicate_reference_rejected() {
        let relay = relay();
        let reference = Uuid::new_v4();
        let _handle = relay.open(&setup(reference)).unwrap();
        let err = relay.open(&setup(reference)).unwrap_err();
        assert!(matches!(err, DonationError::WidgetRejected(_)));
    }

    #[test]
    fn test_session_limit() {
        let relay = relay();
        let first = Uuid::new_v4();
        let _a = relay.open(&setup(first)).unwrap();
        let _b = relay.open(&setup(Uuid::new_v4())).unwrap();

        let err = relay.open(&setup(Uuid::new_v4())).unwrap_err();
        assert_eq!(err, DonationError::SessionsFull);
        assert_eq!(err.kind(), crate::donation::ErrorKind::Integration);

        assert!(relay.resolve(&first, WidgetOutcome::Closed));
        assert!(relay.open(&setup(Uuid::new_v4())).is_ok());
    }
}
