use sqlx::{Postgres, Transaction};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use agora_app::repository::ReportRepository;
use agora_types::{
    errors::{ApplicationError, DbError},
    report::{Report, ReportStatus},
};

use crate::models::ReportRow;

#[derive(Clone)]
pub struct PostgresReportRepository<'a> {
    tx: Arc<Mutex<Transaction<'a, Postgres>>>,
}

impl<'a> PostgresReportRepository<'a> {
    pub fn new(tx: Arc<Mutex<Transaction<'a, Postgres>>>) -> Self {
        Self { tx }
    }
}

#[async_trait::async_trait]
impl<'a> ReportRepository for PostgresReportRepository<'a> {
    async fn add(&self, report: &Report) -> Result<(), ApplicationError> {
        let mut tx_guard = self.tx.lock().await;

        sqlx::query(
            r#"
            INSERT INTO reports
                (id, post_id, reporter_user_id, reason, description, status,
                 admin_note, resolved_at, resolved_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(report.id)
        .bind(report.post_id)
        .bind(report.reporter_user_id)
        .bind(report.reason.as_str())
        .bind(&report.description)
        .bind(report.status.as_str())
        .bind(&report.admin_note)
        .bind(report.resolved_at)
        .bind(report.resolved_by)
        .bind(report.created_at)
        .bind(report.updated_at)
        .execute(&mut *tx_guard.as_mut())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(())
    }

    async fn save(&self, report: &Report) -> Result<(), ApplicationError> {
        let mut tx_guard = self.tx.lock().await;

        sqlx::query(
            r#"
            UPDATE reports
            SET status = $2,
                admin_note = $3,
                resolved_at = $4,
                resolved_by = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(report.id)
        .bind(report.status.as_str())
        .bind(&report.admin_note)
        .bind(report.resolved_at)
        .bind(report.resolved_by)
        .bind(report.updated_at)
        .execute(&mut *tx_guard.as_mut())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Report, ApplicationError> {
        let mut tx_guard = self.tx.lock().await;

        let row = sqlx::query_as::<_, ReportRow>(
            r#"
            SELECT id, post_id, reporter_user_id, reason, description, status,
                   admin_note, resolved_at, resolved_by, created_at, updated_at
            FROM reports
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx_guard.as_mut())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?
        .ok_or(ApplicationError::Db(DbError::ReportByIdNotFound(id)))?;

        row.try_into()
    }

    async fn find_by_post_and_reporter(
        &self,
        post_id: Uuid,
        reporter_user_id: Uuid,
    ) -> Result<Option<Report>, ApplicationError> {
        let mut tx_guard = self.tx.lock().await;

        let row = sqlx::query_as::<_, ReportRow>(
            r#"
            SELECT id, post_id, reporter_user_id, reason, description, status,
                   admin_note, resolved_at, resolved_by, created_at, updated_at
            FROM reports
            WHERE post_id = $1 AND reporter_user_id = $2
            "#,
        )
        .bind(post_id)
        .bind(reporter_user_id)
        .fetch_optional(&mut *tx_guard.as_mut())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        row.map(Report::try_from).transpose()
    }

    async fn list(
        &self,
        status: Option<ReportStatus>,
        limit: i64,
    ) -> Result<Vec<Report>, ApplicationError> {
        let mut tx_guard = self.tx.lock().await;

        let rows = match status {
            Some(status) => {
                sqlx::query_as::<_, ReportRow>(
                    r#"
                    SELECT id, post_id, reporter_user_id, reason, description, status,
                           admin_note, resolved_at, resolved_by, created_at, updated_at
                    FROM reports
                    WHERE status = $1
                    ORDER BY created_at DESC
                    LIMIT $2
                    "#,
                )
                .bind(status.as_str())
                .bind(limit)
                .fetch_all(&mut *tx_guard.as_mut())
                .await
            }
            None => {
                sqlx::query_as::<_, ReportRow>(
                    r#"
                    SELECT id, post_id, reporter_user_id, reason, description, status,
                           admin_note, resolved_at, resolved_by, created_at, updated_at
                    FROM reports
                    ORDER BY created_at DESC
                    LIMIT $1
                    "#,
                )
                .bind(limit)
                .fetch_all(&mut *tx_guard.as_mut())
                .await
            }
        }
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        rows.into_iter().map(Report::try_from).collect()
    }

    async fn count_for_post(&self, post_id: Uuid) -> Result<i64, ApplicationError> {
        let mut tx_guard = self.tx.lock().await;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reports WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(&mut *tx_guard.as_mut())
            .await
            .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(count)
    }
}
