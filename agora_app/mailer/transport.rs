use thiserror::Error;

/// Whatever went wrong between us and the mail provider.
///
/// The dispatcher does not interpret provider error taxonomies; every
/// failure collapses to this single opaque reason.
#[derive(Debug, Clone, Error)]
#[error("Mail transport failure: {0}")]
pub struct TransportError(pub String);

/// Outcome of a delivery attempt, as a value.
///
/// `Failed` is not an error: the caller decides whether an undelivered
/// notification matters for its use case. The dispatcher has already
/// recorded the failure durably by the time it returns this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryResult {
    Delivered,
    Failed,
}

impl DeliveryResult {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryResult::Delivered)
    }
}

/// Abstract channel capable of delivering a rendered message to an address.
#[async_trait::async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), TransportError>;
}
