use std::sync::Arc;
use uuid::Uuid;

use agora_types::{
    Result,
    errors::ApplicationError,
    notification::NotificationEvent,
    report::{Report, ReportOutcome, ReportReason},
};

use crate::{
    app_bus::AppBus,
    command_handlers::{
        DecideReportCommandHandler, ReviewReportCommandHandler, SubmitReportCommandHandler,
    },
    config::Config,
    cqrs::{
        commands::{DecideReport, ReviewReport, SubmitReport},
        queries::GetPostReportActivity,
    },
    mailer::{DeliveryResult, Mailer},
    queries_handlers::GetPostReportActivityHandler,
};

/// What a decision produced besides the state change: the decided report
/// and the fate of the mails it triggered. Undelivered mail is information
/// here, not an error.
#[derive(Debug, Clone)]
pub struct DecisionNotices {
    pub report: Report,
    pub reporter_notice: DeliveryResult,
    /// Set when the upheld report pushed the post over the warning
    /// threshold and a warning mail to its author was attempted.
    pub author_warning: Option<DeliveryResult>,
}

/// The moderation surface API handlers talk to.
///
/// State changes go through the bus (one transaction each); notifications
/// are dispatched strictly after the transaction has committed.
pub struct ModerationService {
    bus: Arc<AppBus>,
    mailer: Arc<Mailer>,
    config: Arc<Config>,
}

impl ModerationService {
    pub fn new(bus: Arc<AppBus>, mailer: Arc<Mailer>, config: Arc<Config>) -> Self {
        Self {
            bus,
            mailer,
            config,
        }
    }

    /// Files a new report against a post.
    pub async fn submit_report(
        &self,
        post_id: Uuid,
        reporter_user_id: Uuid,
        reason: ReportReason,
        description: Option<String>,
    ) -> Result<Report, ApplicationError> {
        self.bus
            .execute(
                SubmitReport {
                    id: Uuid::new_v4(),
                    post_id,
                    reporter_user_id,
                    reason,
                    description,
                },
                SubmitReportCommandHandler::new(),
            )
            .await
    }

    /// Marks a report as being looked at by an administrator.
    pub async fn review_report(
        &self,
        report_id: Uuid,
        admin_user_id: Uuid,
    ) -> Result<Report, ApplicationError> {
        self.bus
            .execute(
                ReviewReport {
                    report_id,
                    admin_user_id,
                },
                ReviewReportCommandHandler::new(),
            )
            .await
    }

    /// Decides a report and notifies the people involved.
    ///
    /// The decision commits first; only then is mail attempted. An upheld
    /// report additionally warns the post author once the post has
    /// accumulated enough reports.
    pub async fn decide_report(
        &self,
        report_id: Uuid,
        admin_user_id: Uuid,
        outcome: ReportOutcome,
        note: Option<String>,
    ) -> Result<DecisionNotices, ApplicationError> {
        let event = self
            .bus
            .execute(
                DecideReport {
                    report_id,
                    admin_user_id,
                    outcome,
                    note,
                },
                DecideReportCommandHandler::new(),
            )
            .await?;

        let report = match event.report() {
            Some(report) => report.clone(),
            None => {
                // DecideReport only ever emits report events.
                return Err(ApplicationError::Unknown(
                    "decision emitted an event without a report".to_string(),
                ));
            }
        };

        let reporter_notice = self.mailer.dispatch(&event).await;

        let author_warning = if outcome == ReportOutcome::Resolved {
            self.warn_author_if_needed(report.post_id).await
        } else {
            None
        };

        Ok(DecisionNotices {
            report,
            reporter_notice,
            author_warning,
        })
    }

    /// Broadcast an operational notice to every administrator.
    pub async fn notify_admins(
        &self,
        subject: &str,
        body: &str,
    ) -> Result<Vec<(Uuid, DeliveryResult)>, ApplicationError> {
        self.mailer.broadcast_to_admins(subject, body).await
    }

    async fn warn_author_if_needed(&self, post_id: Uuid) -> Option<DeliveryResult> {
        let activity = match self
            .bus
            .query(
                GetPostReportActivity { post_id },
                GetPostReportActivityHandler::new(),
            )
            .await
        {
            Ok(activity) => activity,
            Err(e) => {
                // The decision is already committed; a failed lookup only
                // costs the warning mail.
                tracing::warn!(
                    post_id = %post_id,
                    error = %e,
                    "Could not evaluate repeated-report warning"
                );
                return None;
            }
        };

        if activity.report_count < self.config.report_warn_threshold {
            return None;
        }

        let event = NotificationEvent::ReportWarning {
            user: activity.author,
            post: activity.post,
            report_count: activity.report_count,
        };
        Some(self.mailer.dispatch(&event).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_types::{
        errors::ModerationError,
        notification::NotificationKind,
        report::ReportStatus,
    };

    use crate::test_utils::tests::{FakeTransport, TestWorld};

    #[tokio::test]
    async fn test_submit_then_duplicate() {
        let world = TestWorld::new();
        let reporter = world.add_user("Riley", "riley@example.com");
        let post = world.add_post("A questionable post");

        let service = world.moderation(FakeTransport::new());

        let report = service
            .submit_report(post.id, reporter.id, ReportReason::Spam, None)
            .await
            .unwrap();
        assert_eq!(report.status, ReportStatus::Pending);

        let err = service
            .submit_report(post.id, reporter.id, ReportReason::Spam, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Moderation(ModerationError::DuplicateReport { .. })
        ));
    }

    #[tokio::test]
    async fn test_rejected_decision_with_dead_mail_provider() {
        // The §-worth scenario: reporter flags a post as spam, the admin
        // dismisses the report, and the mail provider is down.
        let world = TestWorld::new();
        let admin = world.add_admin("Alex", "alex@example.com");
        let reporter = world.add_user("Riley", "riley@example.com");
        let post = world.add_post("Crochet patterns");

        let transport = FakeTransport::failing();
        let service = world.moderation(transport.clone());

        let report = service
            .submit_report(post.id, reporter.id, ReportReason::Spam, None)
            .await
            .unwrap();

        let notices = service
            .decide_report(
                report.id,
                admin.id,
                ReportOutcome::Rejected,
                Some("No violation found".to_string()),
            )
            .await
            .unwrap();

        // The decision stands even though no mail went out.
        assert_eq!(notices.report.status, ReportStatus::Rejected);
        assert_eq!(notices.reporter_notice, DeliveryResult::Failed);
        assert!(notices.author_warning.is_none());
        assert_eq!(world.reports.get(report.id).status, ReportStatus::Rejected);

        let records = world.failed_notifications.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_id, reporter.id);
        assert_eq!(records[0].kind, NotificationKind::ReportRejected);
    }

    #[tokio::test]
    async fn test_upheld_decision_mails_reporter() {
        let world = TestWorld::new();
        let admin = world.add_admin("Alex", "alex@example.com");
        let reporter = world.add_user("Riley", "riley@example.com");
        let post = world.add_post("Suspicious giveaway");

        let transport = FakeTransport::new();
        let service = world.moderation(transport.clone());

        let report = service
            .submit_report(post.id, reporter.id, ReportReason::Spam, None)
            .await
            .unwrap();
        let notices = service
            .decide_report(report.id, admin.id, ReportOutcome::Resolved, None)
            .await
            .unwrap();

        assert_eq!(notices.reporter_notice, DeliveryResult::Delivered);

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "riley@example.com");
        assert!(sent[0].body.contains("Suspicious giveaway"));
    }

    #[tokio::test]
    async fn test_author_warned_once_post_reaches_threshold() {
        let world = TestWorld::new();
        let admin = world.add_admin("Alex", "alex@example.com");
        let author = world.add_user("Jo", "jo@example.com");
        let post = world.add_post_by(&author, "Reported a lot");

        let transport = FakeTransport::new();
        let service = world.moderation(transport.clone());

        // Default warning threshold is three reports on the same post.
        let mut last_report = None;
        for i in 0..3 {
            let reporter = world.add_user("Reporter", &format!("reporter{i}@example.com"));
            last_report = Some(
                service
                    .submit_report(post.id, reporter.id, ReportReason::Harassment, None)
                    .await
                    .unwrap(),
            );
        }

        let notices = service
            .decide_report(
                last_report.unwrap().id,
                admin.id,
                ReportOutcome::Resolved,
                Some("Content removed".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(notices.author_warning, Some(DeliveryResult::Delivered));

        let sent = transport.sent();
        let warning = sent
            .iter()
            .find(|mail| mail.to == "jo@example.com")
            .expect("author warning mail");
        assert!(warning.subject.contains("Warning"));
        assert!(warning.body.contains("3 times"));
    }

    #[tokio::test]
    async fn test_no_warning_below_threshold() {
        let world = TestWorld::new();
        let admin = world.add_admin("Alex", "alex@example.com");
        let author = world.add_user("Jo", "jo@example.com");
        let post = world.add_post_by(&author, "Mildly contested");
        let reporter = world.add_user("Riley", "riley@example.com");

        let transport = FakeTransport::new();
        let service = world.moderation(transport.clone());

        let report = service
            .submit_report(post.id, reporter.id, ReportReason::Other, None)
            .await
            .unwrap();
        let notices = service
            .decide_report(report.id, admin.id, ReportOutcome::Resolved, None)
            .await
            .unwrap();

        assert!(notices.author_warning.is_none());
        assert!(transport.sent().iter().all(|mail| mail.to != "jo@example.com"));
    }
}
