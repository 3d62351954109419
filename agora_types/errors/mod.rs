mod db_error;
mod moderation_error;

pub use db_error::DbError;
pub use moderation_error::ModerationError;

use thiserror::Error;

pub type Result<T, E = ApplicationError> = std::result::Result<T, E>;

/// Top level error type crossing crate boundaries.
#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Moderation(#[from] ModerationError),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
