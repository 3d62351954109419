use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use agora_types::{
    common::{Post, Role, User},
    errors::{ApplicationError, DbError},
    report::{Report, ReportReason, ReportStatus},
};

/// Row models mirror the table layout; the enum-ish TEXT columns are
/// validated on the way out, so domain code never sees a raw string.

#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl TryFrom<UserRow> for User {
    type Error = ApplicationError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::parse(&row.role).ok_or(DbError::InvalidColumn {
            column: "role",
            value: row.role,
        })?;

        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            role,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct PostRow {
    pub id: Uuid,
    pub author_user_id: Uuid,
    pub title: String,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: row.id,
            author_user_id: row.author_user_id,
            title: row.title,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct ReportRow {
    pub id: Uuid,
    pub post_id: Uuid,
    pub reporter_user_id: Uuid,
    pub reason: String,
    pub description: Option<String>,
    pub status: String,
    pub admin_note: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ReportRow> for Report {
    type Error = ApplicationError;

    fn try_from(row: ReportRow) -> Result<Self, Self::Error> {
        let reason = ReportReason::parse(&row.reason).ok_or(DbError::InvalidColumn {
            column: "reason",
            value: row.reason,
        })?;
        let status = ReportStatus::parse(&row.status).ok_or(DbError::InvalidColumn {
            column: "status",
            value: row.status,
        })?;

        Ok(Report {
            id: row.id,
            post_id: row.post_id,
            reporter_user_id: row.reporter_user_id,
            reason,
            description: row.description,
            status,
            admin_note: row.admin_note,
            resolved_at: row.resolved_at,
            resolved_by: row.resolved_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
