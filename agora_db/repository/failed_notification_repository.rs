use sqlx::{Postgres, Transaction};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use agora_app::repository::{FailedNotificationRepository, NewFailedNotification};
use agora_types::errors::{ApplicationError, DbError};

#[derive(Clone)]
pub struct PostgresFailedNotificationRepository<'a> {
    tx: Arc<Mutex<Transaction<'a, Postgres>>>,
}

impl<'a> PostgresFailedNotificationRepository<'a> {
    pub fn new(tx: Arc<Mutex<Transaction<'a, Postgres>>>) -> Self {
        Self { tx }
    }
}

#[async_trait::async_trait]
impl<'a> FailedNotificationRepository for PostgresFailedNotificationRepository<'a> {
    async fn add(&self, record: &NewFailedNotification) -> Result<(), ApplicationError> {
        let mut tx_guard = self.tx.lock().await;

        sqlx::query(
            r#"
            INSERT INTO failed_notifications (id, user_id, kind, data)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(record.user_id)
        .bind(record.kind.as_str())
        .bind(&record.data)
        .execute(&mut *tx_guard.as_mut())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(())
    }
}
