mod health;
mod reports;

pub use health::health;
pub use reports::{decide_report, get_report, list_reports, review_report, submit_report};

use axum::{Json, http::StatusCode};
use serde::Serialize;

use agora_types::errors::{ApplicationError, DbError, ModerationError};

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Maps domain errors onto HTTP statuses. Precondition violations are
/// conflicts, missing rows are 404s, anything else is on us.
pub fn error_response(err: ApplicationError) -> (StatusCode, Json<ErrorBody>) {
    let status = match &err {
        ApplicationError::Moderation(ModerationError::DuplicateReport { .. }) => {
            StatusCode::CONFLICT
        }
        ApplicationError::Moderation(ModerationError::AlreadyDecided { .. }) => {
            StatusCode::CONFLICT
        }
        ApplicationError::Moderation(ModerationError::NotAnAdministrator { .. }) => {
            StatusCode::FORBIDDEN
        }
        ApplicationError::Db(
            DbError::UserByIdNotFound(_)
            | DbError::PostByIdNotFound(_)
            | DbError::ReportByIdNotFound(_),
        ) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "Unhandled error in request handler");
    }

    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_error_statuses() {
        let dup = ApplicationError::Moderation(ModerationError::DuplicateReport {
            post_id: Uuid::new_v4(),
            reporter_user_id: Uuid::new_v4(),
        });
        assert_eq!(error_response(dup).0, StatusCode::CONFLICT);

        let decided = ApplicationError::Moderation(ModerationError::AlreadyDecided {
            report_id: Uuid::new_v4(),
        });
        assert_eq!(error_response(decided).0, StatusCode::CONFLICT);

        let missing = ApplicationError::Db(DbError::ReportByIdNotFound(Uuid::new_v4()));
        assert_eq!(error_response(missing).0, StatusCode::NOT_FOUND);

        let unknown = ApplicationError::Unknown("boom".to_string());
        assert_eq!(
            error_response(unknown).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
