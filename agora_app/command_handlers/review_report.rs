use chrono::Utc;
use std::sync::Arc;

use agora_types::{Result, errors::ModerationError, report::Report};

use crate::{
    config::Config,
    cqrs::{CommandHandler, commands::ReviewReport},
    uow::UnitOfWork,
};

pub struct ReviewReportCommandHandler;

impl ReviewReportCommandHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl CommandHandler<ReviewReport> for ReviewReportCommandHandler {
    async fn handle(
        &self,
        command: ReviewReport,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        _config: &Arc<Config>,
    ) -> Result<Report> {
        let report_repo = uow.reports();
        let user_repo = uow.users();

        let admin = user_repo.get_by_id(command.admin_user_id).await?;
        if !admin.is_admin() {
            return Err(ModerationError::NotAnAdministrator { user_id: admin.id }.into());
        }

        let mut report = report_repo.get_by_id(command.report_id).await?;
        report.mark_reviewed(Utc::now())?;
        report_repo.save(&report).await?;

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use agora_types::{
        Result,
        report::{ReportReason, ReportStatus},
    };

    use super::*;
    use crate::test_utils::tests::TestWorld;

    #[tokio::test]
    async fn test_review_marks_report_reviewed() -> Result<()> {
        let world = TestWorld::new();
        let admin = world.add_admin("Alex", "alex@example.com");
        let reporter = world.add_user("Riley", "riley@example.com");
        let post = world.add_post("Borderline post");
        let report = world.add_report(&post, &reporter, ReportReason::Inappropriate);

        let uow = world.uow();
        let handler = ReviewReportCommandHandler::new();
        let reviewed = handler
            .handle(
                ReviewReport {
                    report_id: report.id,
                    admin_user_id: admin.id,
                },
                &uow,
                &world.config(),
            )
            .await?;

        assert_eq!(reviewed.status, ReportStatus::Reviewed);
        assert_eq!(world.reports.get(report.id).status, ReportStatus::Reviewed);
        Ok(())
    }

    #[tokio::test]
    async fn test_terminal_report_cannot_be_reviewed() -> Result<()> {
        let world = TestWorld::new();
        let admin = world.add_admin("Alex", "alex@example.com");
        let reporter = world.add_user("Riley", "riley@example.com");
        let post = world.add_post("Already handled");
        let report = world.add_decided_report(&post, &reporter, &admin);

        let uow = world.uow();
        let handler = ReviewReportCommandHandler::new();
        let result = handler
            .handle(
                ReviewReport {
                    report_id: report.id,
                    admin_user_id: admin.id,
                },
                &uow,
                &world.config(),
            )
            .await;

        assert!(result.is_err());
        Ok(())
    }
}
