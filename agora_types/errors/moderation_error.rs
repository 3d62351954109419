use thiserror::Error;
use uuid::Uuid;

/// Errors for moderation domain rules.
#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("Post {post_id} was already reported by user {reporter_user_id}")]
    DuplicateReport {
        post_id: Uuid,
        reporter_user_id: Uuid,
    },

    #[error("Report {report_id} has already been decided")]
    AlreadyDecided { report_id: Uuid },

    #[error("User {user_id} is not an administrator")]
    NotAnAdministrator { user_id: Uuid },
}
