use chrono::Utc;
use std::sync::Arc;

use agora_types::{Result, errors::ModerationError, report::Report};

use crate::{
    config::Config,
    cqrs::{CommandHandler, commands::SubmitReport},
    uow::UnitOfWork,
};

pub struct SubmitReportCommandHandler;

impl SubmitReportCommandHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl CommandHandler<SubmitReport> for SubmitReportCommandHandler {
    async fn handle(
        &self,
        command: SubmitReport,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        _config: &Arc<Config>,
    ) -> Result<Report> {
        let report_repo = uow.reports();
        let user_repo = uow.users();
        let post_repo = uow.posts();

        // Both references must exist before anything is written.
        let reporter = user_repo.get_by_id(command.reporter_user_id).await?;
        let post = post_repo.get_by_id(command.post_id).await?;

        if report_repo
            .find_by_post_and_reporter(post.id, reporter.id)
            .await?
            .is_some()
        {
            return Err(ModerationError::DuplicateReport {
                post_id: post.id,
                reporter_user_id: reporter.id,
            }
            .into());
        }

        let report = Report::new(
            command.id,
            post.id,
            reporter.id,
            command.reason,
            command.description,
            Utc::now(),
        );
        report_repo.add(&report).await?;

        Ok(report)
    }
}
