use thiserror::Error;
use uuid::Uuid;

/// Errors for the persistence layer.
#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("User {0} not found")]
    UserByIdNotFound(Uuid),

    #[error("Post {0} not found")]
    PostByIdNotFound(Uuid),

    #[error("Report {0} not found")]
    ReportByIdNotFound(Uuid),

    #[error("Invalid {column} value in row: {value}")]
    InvalidColumn { column: &'static str, value: String },

    #[error("Transaction error: {0}")]
    Transaction(String),
}
