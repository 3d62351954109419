use uuid::Uuid;

use agora_types::{errors::ApplicationError, notification::NotificationKind};

/// A notification that could not be delivered, queued for out-of-band retry.
#[derive(Debug, Clone)]
pub struct NewFailedNotification {
    pub user_id: Uuid,
    pub kind: NotificationKind,
    /// Enough context to rebuild and resend the message later.
    pub data: serde_json::Value,
}

/// Append-only ledger of undeliverable notifications. Rows are consumed
/// by an external retry process; this backend never updates or deletes them.
#[async_trait::async_trait]
pub trait FailedNotificationRepository: Send + Sync {
    async fn add(&self, record: &NewFailedNotification) -> Result<(), ApplicationError>;
}
