use uuid::Uuid;

use agora_types::{
    errors::ApplicationError,
    report::{Report, ReportStatus},
};

#[async_trait::async_trait]
pub trait ReportRepository: Send + Sync {
    /// Inserts a freshly submitted report.
    async fn add(&self, report: &Report) -> Result<(), ApplicationError>;

    /// Persists the mutable fields of an existing report
    /// (status, note, resolver, timestamps) in one statement.
    async fn save(&self, report: &Report) -> Result<(), ApplicationError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Report, ApplicationError>;

    async fn find_by_post_and_reporter(
        &self,
        post_id: Uuid,
        reporter_user_id: Uuid,
    ) -> Result<Option<Report>, ApplicationError>;

    async fn list(
        &self,
        status: Option<ReportStatus>,
        limit: i64,
    ) -> Result<Vec<Report>, ApplicationError>;

    /// Number of reports ever filed against a post, regardless of status.
    async fn count_for_post(&self, post_id: Uuid) -> Result<i64, ApplicationError>;
}
