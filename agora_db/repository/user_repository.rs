use sqlx::{Postgres, Transaction};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use agora_app::repository::UserRepository;
use agora_types::{
    common::User,
    errors::{ApplicationError, DbError},
};

use crate::models::UserRow;

#[derive(Clone)]
pub struct PostgresUserRepository<'a> {
    tx: Arc<Mutex<Transaction<'a, Postgres>>>,
}

impl<'a> PostgresUserRepository<'a> {
    pub fn new(tx: Arc<Mutex<Transaction<'a, Postgres>>>) -> Self {
        Self { tx }
    }
}

#[async_trait::async_trait]
impl<'a> UserRepository for PostgresUserRepository<'a> {
    async fn get_by_id(&self, id: Uuid) -> Result<User, ApplicationError> {
        let mut tx_guard = self.tx.lock().await;

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, role
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx_guard.as_mut())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?
        .ok_or(ApplicationError::Db(DbError::UserByIdNotFound(id)))?;

        row.try_into()
    }

    async fn list_admins(&self) -> Result<Vec<User>, ApplicationError> {
        let mut tx_guard = self.tx.lock().await;

        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, role
            FROM users
            WHERE role = 'admin'
            ORDER BY email
            "#,
        )
        .fetch_all(&mut *tx_guard.as_mut())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        rows.into_iter().map(User::try_from).collect()
    }
}
