use sqlx::{Postgres, Transaction};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use agora_app::repository::PostRepository;
use agora_types::{
    common::Post,
    errors::{ApplicationError, DbError},
};

use crate::models::PostRow;

#[derive(Clone)]
pub struct PostgresPostRepository<'a> {
    tx: Arc<Mutex<Transaction<'a, Postgres>>>,
}

impl<'a> PostgresPostRepository<'a> {
    pub fn new(tx: Arc<Mutex<Transaction<'a, Postgres>>>) -> Self {
        Self { tx }
    }
}

#[async_trait::async_trait]
impl<'a> PostRepository for PostgresPostRepository<'a> {
    async fn get_by_id(&self, id: Uuid) -> Result<Post, ApplicationError> {
        let mut tx_guard = self.tx.lock().await;

        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, author_user_id, title
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx_guard.as_mut())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?
        .ok_or(ApplicationError::Db(DbError::PostByIdNotFound(id)))?;

        Ok(row.into())
    }
}
