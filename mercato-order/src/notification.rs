use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A rendered confirmation ready for delivery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmationMessage {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("confirmation delivery failed: {0}")]
    Delivery(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl NotifyError {
    pub fn delivery<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        NotifyError::Delivery(err.into())
    }
}

/// Outbound channel for customer confirmations. No retry is built in;
/// the caller decides what a failed delivery means for its own state.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn deliver(&self, message: &ConfirmationMessage) -> Result<(), NotifyError>;
}

/// Recording gateway for tests and local runs
#[derive(Default)]
pub struct MockNotificationGateway {
    sent: Mutex<Vec<ConfirmationMessage>>,
    fail: AtomicBool,
}

impl MockNotificationGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway whose every delivery attempt fails
    pub fn failing() -> Self {
        let gateway = Self::default();
        gateway.fail.store(true, Ordering::SeqCst);
        gateway
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<ConfirmationMessage> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl NotificationGateway for MockNotificationGateway {
    async fn deliver(&self, message: &ConfirmationMessage) -> Result<(), NotifyError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotifyError::delivery("simulated delivery failure"));
        }

        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> ConfirmationMessage {
        ConfirmationMessage {
            recipient: "customer@example.com".to_string(),
            subject: "Order Confirmation".to_string(),
            body: "Thanks for your order.".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_records_deliveries() {
        let gateway = MockNotificationGateway::new();

        gateway.deliver(&message()).await.unwrap();

        assert_eq!(gateway.sent_count(), 1);
        assert_eq!(gateway.sent()[0].recipient, "customer@example.com");
    }

    #[tokio::test]
    async fn test_failing_mock_records_nothing() {
        let gateway = MockNotificationGateway::failing();

        let result = gateway.deliver(&message()).await;

        assert!(result.is_err());
        assert_eq!(gateway.sent_count(), 0);
    }
}
