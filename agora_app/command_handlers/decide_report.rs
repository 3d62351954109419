use chrono::Utc;
use std::sync::Arc;

use agora_types::{
    Result,
    errors::ModerationError,
    notification::NotificationEvent,
    report::ReportOutcome,
};

use crate::{
    config::Config,
    cqrs::{CommandHandler, commands::DecideReport},
    uow::UnitOfWork,
};

pub struct DecideReportCommandHandler;

impl DecideReportCommandHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl CommandHandler<DecideReport> for DecideReportCommandHandler {
    async fn handle(
        &self,
        command: DecideReport,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        _config: &Arc<Config>,
    ) -> Result<NotificationEvent> {
        let report_repo = uow.reports();
        let user_repo = uow.users();
        let post_repo = uow.posts();

        let admin = user_repo.get_by_id(command.admin_user_id).await?;
        if !admin.is_admin() {
            return Err(ModerationError::NotAnAdministrator { user_id: admin.id }.into());
        }

        let mut report = report_repo.get_by_id(command.report_id).await?;
        report.decide(command.outcome, admin.id, command.note, Utc::now())?;
        report_repo.save(&report).await?;

        let reporter = user_repo.get_by_id(report.reporter_user_id).await?;
        let post = post_repo.get_by_id(report.post_id).await?;

        let event = match command.outcome {
            ReportOutcome::Resolved => NotificationEvent::ReportAccepted {
                reporter,
                post_title: post.title,
                report,
            },
            ReportOutcome::Rejected => NotificationEvent::ReportRejected {
                reporter,
                post_title: post.title,
                report,
            },
        };

        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use agora_types::{
        Result,
        errors::{ApplicationError, ModerationError},
        notification::NotificationKind,
        report::{ReportReason, ReportStatus},
    };

    use super::*;
    use crate::test_utils::tests::TestWorld;

    #[tokio::test]
    async fn test_decide_resolved_emits_accepted_event() -> Result<()> {
        let world = TestWorld::new();
        let admin = world.add_admin("Alex", "alex@example.com");
        let reporter = world.add_user("Riley", "riley@example.com");
        let post = world.add_post("Suspicious giveaway");
        let report = world.add_report(&post, &reporter, ReportReason::Spam);

        let uow = world.uow();
        let handler = DecideReportCommandHandler::new();
        let command = DecideReport {
            report_id: report.id,
            admin_user_id: admin.id,
            outcome: ReportOutcome::Resolved,
            note: Some("Post removed".to_string()),
        };

        let event = handler.handle(command, &uow, &world.config()).await?;

        assert_eq!(event.kind(), NotificationKind::ReportAccepted);
        assert_eq!(event.recipient().id, reporter.id);
        assert_eq!(event.report_id(), Some(report.id));

        let stored = world.reports.get(report.id);
        assert_eq!(stored.status, ReportStatus::Resolved);
        assert_eq!(stored.resolved_by, Some(admin.id));
        assert!(stored.resolved_at.is_some());
        assert_eq!(stored.admin_note.as_deref(), Some("Post removed"));
        Ok(())
    }

    #[tokio::test]
    async fn test_decide_rejected_emits_rejected_event() -> Result<()> {
        let world = TestWorld::new();
        let admin = world.add_admin("Alex", "alex@example.com");
        let reporter = world.add_user("Riley", "riley@example.com");
        let post = world.add_post("Perfectly fine post");
        let report = world.add_report(&post, &reporter, ReportReason::Fake);

        let uow = world.uow();
        let handler = DecideReportCommandHandler::new();
        let command = DecideReport {
            report_id: report.id,
            admin_user_id: admin.id,
            outcome: ReportOutcome::Rejected,
            note: Some("No violation found".to_string()),
        };

        let event = handler.handle(command, &uow, &world.config()).await?;

        assert_eq!(event.kind(), NotificationKind::ReportRejected);
        assert_eq!(world.reports.get(report.id).status, ReportStatus::Rejected);
        Ok(())
    }

    #[tokio::test]
    async fn test_decide_twice_fails_and_leaves_report_unchanged() -> Result<()> {
        let world = TestWorld::new();
        let admin = world.add_admin("Alex", "alex@example.com");
        let reporter = world.add_user("Riley", "riley@example.com");
        let post = world.add_post("Suspicious giveaway");
        let report = world.add_report(&post, &reporter, ReportReason::Spam);

        let uow = world.uow();
        let handler = DecideReportCommandHandler::new();

        handler
            .handle(
                DecideReport {
                    report_id: report.id,
                    admin_user_id: admin.id,
                    outcome: ReportOutcome::Rejected,
                    note: None,
                },
                &uow,
                &world.config(),
            )
            .await?;
        let snapshot = world.reports.get(report.id);

        let err = handler
            .handle(
                DecideReport {
                    report_id: report.id,
                    admin_user_id: admin.id,
                    outcome: ReportOutcome::Resolved,
                    note: Some("changed my mind".to_string()),
                },
                &uow,
                &world.config(),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::Moderation(ModerationError::AlreadyDecided { report_id })
                if report_id == report.id
        ));
        assert_eq!(world.reports.get(report.id), snapshot);
        Ok(())
    }

    #[tokio::test]
    async fn test_non_admin_cannot_decide() -> Result<()> {
        let world = TestWorld::new();
        let not_admin = world.add_user("Jo", "jo@example.com");
        let reporter = world.add_user("Riley", "riley@example.com");
        let post = world.add_post("Some post");
        let report = world.add_report(&post, &reporter, ReportReason::Other);

        let uow = world.uow();
        let handler = DecideReportCommandHandler::new();
        let err = handler
            .handle(
                DecideReport {
                    report_id: report.id,
                    admin_user_id: not_admin.id,
                    outcome: ReportOutcome::Resolved,
                    note: None,
                },
                &uow,
                &world.config(),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::Moderation(ModerationError::NotAnAdministrator { .. })
        ));
        assert_eq!(world.reports.get(report.id).status, ReportStatus::Pending);
        Ok(())
    }
}
