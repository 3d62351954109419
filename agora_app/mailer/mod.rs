pub mod templates;
mod transport;

pub use transport::{DeliveryResult, MailTransport, TransportError};

use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use agora_types::{
    common::User,
    errors::ApplicationError,
    notification::{NotificationEvent, NotificationKind},
};

use crate::{
    config::Config,
    repository::NewFailedNotification,
    uow::UnitOfWorkProvider,
};

/// Turns domain events into outbound mail.
///
/// Delivery runs strictly after the transaction that produced the event has
/// committed: a dead mail provider can cost us an email, never a moderation
/// decision. Undeliverable messages land in the failed-notification ledger
/// for out-of-band retry instead of surfacing as errors.
pub struct Mailer {
    transport: Arc<dyn MailTransport>,
    uow_provider: Arc<dyn UnitOfWorkProvider>,
    config: Arc<Config>,
}

impl Mailer {
    pub fn new(
        transport: Arc<dyn MailTransport>,
        uow_provider: Arc<dyn UnitOfWorkProvider>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            transport,
            uow_provider,
            config,
        }
    }

    /// Renders and attempts delivery of one notification.
    ///
    /// Never returns an error: a transport failure is logged, written to the
    /// failure ledger and reported back as `DeliveryResult::Failed`.
    pub async fn dispatch(&self, event: &NotificationEvent) -> DeliveryResult {
        let mail = templates::render(event);
        let recipient = event.recipient();
        let kind = event.kind();

        match self
            .transport
            .send(&recipient.email, &mail.subject, &mail.body)
            .await
        {
            Ok(()) => {
                tracing::info!(
                    user_id = %recipient.id,
                    email = %recipient.email,
                    kind = %kind,
                    report_id = ?event.report_id(),
                    post_id = ?event.post_id(),
                    "Notification email delivered"
                );
                DeliveryResult::Delivered
            }
            Err(err) => {
                self.handle_failure(event, recipient, kind, &err).await;
                DeliveryResult::Failed
            }
        }
    }

    /// Sends a raw message to every administrator account.
    ///
    /// Deliveries are independent: one failing admin is logged and skipped,
    /// the loop always attempts all of them.
    pub async fn broadcast_to_admins(
        &self,
        subject: &str,
        body: &str,
    ) -> Result<Vec<(Uuid, DeliveryResult)>, ApplicationError> {
        let admins = self.list_admins().await?;
        let mut results = Vec::with_capacity(admins.len());

        for admin in admins {
            let admin_id = admin.id;
            let event = NotificationEvent::AdminBroadcast {
                admin,
                subject: subject.to_string(),
                body: body.to_string(),
            };

            let result = self.dispatch(&event).await;
            if !result.is_delivered() {
                tracing::warn!(
                    admin_id = %admin_id,
                    "Admin broadcast delivery failed, continuing with remaining admins"
                );
            }
            results.push((admin_id, result));
        }

        Ok(results)
    }

    async fn handle_failure(
        &self,
        event: &NotificationEvent,
        recipient: &User,
        kind: NotificationKind,
        err: &TransportError,
    ) {
        tracing::error!(
            severity = "critical",
            user_id = %recipient.id,
            email = %recipient.email,
            name = %recipient.name,
            kind = %kind,
            report_id = ?event.report_id(),
            post_id = ?event.post_id(),
            action_required = self.action_required(event),
            error = %err,
            "Notification email failed, recording for manual retry"
        );

        let record = NewFailedNotification {
            user_id: recipient.id,
            kind,
            data: retry_payload(event),
        };

        if let Err(ledger_err) = self.record_failure(&record).await {
            // No further durability fallback exists past this point.
            tracing::error!(
                severity = "emergency",
                user_id = %recipient.id,
                kind = %kind,
                error = %ledger_err,
                "Could not record failed notification, event is unrecoverable"
            );
        }
    }

    /// Operator hint attached to failed warning mails: above the
    /// deactivation threshold a lost warning needs manual follow-up.
    fn action_required(&self, event: &NotificationEvent) -> Option<&'static str> {
        match event {
            NotificationEvent::ReportWarning { report_count, .. } => {
                if *report_count >= self.config.deactivation_threshold {
                    Some("account deactivation review")
                } else {
                    Some("warning")
                }
            }
            _ => None,
        }
    }

    async fn record_failure(&self, record: &NewFailedNotification) -> Result<(), ApplicationError> {
        let uow = self.uow_provider.begin().await?;
        match uow.failed_notifications().add(record).await {
            Ok(()) => uow.commit().await,
            Err(e) => {
                let _ = uow.rollback().await;
                Err(e)
            }
        }
    }

    async fn list_admins(&self) -> Result<Vec<User>, ApplicationError> {
        let uow = self.uow_provider.begin().await?;
        let admins = uow.users().list_admins().await;
        uow.rollback().await?;
        admins
    }
}

/// Context stored alongside a failed notification, enough to rebuild the
/// message during a retry.
fn retry_payload(event: &NotificationEvent) -> serde_json::Value {
    match event {
        NotificationEvent::ReportAccepted { report, .. } => json!({
            "report_id": report.id,
            "post_id": report.post_id,
            "status": "accepted",
        }),
        NotificationEvent::ReportRejected { report, .. } => json!({
            "report_id": report.id,
            "post_id": report.post_id,
            "status": "rejected",
        }),
        NotificationEvent::ReportWarning {
            post, report_count, ..
        } => json!({
            "post_id": post.id,
            "report_count": report_count,
        }),
        NotificationEvent::EmailVerification { verify_url, .. } => json!({
            "verify_url": verify_url,
        }),
        NotificationEvent::PasswordReset { reset_url, .. } => json!({
            "reset_url": reset_url,
        }),
        NotificationEvent::AdminBroadcast { subject, body, .. } => json!({
            "subject": subject,
            "body": body,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_types::common::Post;
    use agora_types::report::ReportReason;

    use crate::test_utils::tests::{FakeTransport, TestWorld};

    fn accepted_event(world: &TestWorld) -> NotificationEvent {
        let admin = world.add_admin("Alex", "alex@example.com");
        let reporter = world.add_user("Riley", "riley@example.com");
        let post = world.add_post("Suspicious giveaway");
        let mut report = world.add_report(&post, &reporter, ReportReason::Spam);
        report
            .decide(
                agora_types::report::ReportOutcome::Resolved,
                admin.id,
                None,
                chrono::Utc::now(),
            )
            .unwrap();

        NotificationEvent::ReportAccepted {
            reporter,
            post_title: post.title,
            report,
        }
    }

    #[tokio::test]
    async fn test_dispatch_success_leaves_ledger_empty() {
        let world = TestWorld::new();
        let transport = FakeTransport::new();
        let mailer = world.mailer(transport.clone());
        let event = accepted_event(&world);

        let result = mailer.dispatch(&event).await;

        assert_eq!(result, DeliveryResult::Delivered);
        assert!(world.failed_notifications.records().is_empty());

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, event.recipient().email);
        assert!(sent[0].subject.contains("upheld"));
    }

    #[tokio::test]
    async fn test_dispatch_failure_is_absorbed_and_recorded() {
        let world = TestWorld::new();
        let transport = FakeTransport::failing();
        let mailer = world.mailer(transport.clone());
        let event = accepted_event(&world);

        let result = mailer.dispatch(&event).await;

        assert_eq!(result, DeliveryResult::Failed);

        let records = world.failed_notifications.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_id, event.recipient().id);
        assert_eq!(records[0].kind, NotificationKind::ReportAccepted);
        assert_eq!(records[0].data["report_id"], json!(event.report_id().unwrap()));
    }

    #[tokio::test]
    async fn test_ledger_failure_is_still_absorbed() {
        // Transport down AND ledger down: the worst case degrades to an
        // emergency log entry, never to an error or panic for the caller.
        let world = TestWorld::new();
        world.failed_notifications.fail_writes();
        let mailer = world.mailer(FakeTransport::failing());
        let event = accepted_event(&world);

        let result = mailer.dispatch(&event).await;

        assert_eq!(result, DeliveryResult::Failed);
        assert!(world.failed_notifications.records().is_empty());
    }

    #[tokio::test]
    async fn test_every_failure_appends_exactly_one_record() {
        let world = TestWorld::new();
        let transport = FakeTransport::failing();
        let mailer = world.mailer(transport.clone());
        let event = accepted_event(&world);

        for _ in 0..3 {
            mailer.dispatch(&event).await;
        }

        assert_eq!(world.failed_notifications.records().len(), 3);
    }

    #[tokio::test]
    async fn test_account_mails_follow_the_same_failure_contract() {
        let world = TestWorld::new();
        let user = world.add_user("Riley", "riley@example.com");
        let mailer = world.mailer(FakeTransport::failing());

        let event = NotificationEvent::PasswordReset {
            user,
            reset_url: "https://agora.community/reset/abc123".to_string(),
        };

        assert_eq!(mailer.dispatch(&event).await, DeliveryResult::Failed);

        let records = world.failed_notifications.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, NotificationKind::PasswordReset);
        assert_eq!(
            records[0].data["reset_url"],
            json!("https://agora.community/reset/abc123")
        );
    }

    #[tokio::test]
    async fn test_broadcast_survives_partial_failure() {
        let world = TestWorld::new();
        world.add_admin("Alex", "alex@example.com");
        world.add_admin("Bo", "bo@example.com");
        world.add_admin("Cam", "cam@example.com");
        world.add_user("Riley", "riley@example.com");

        let transport = FakeTransport::new();
        transport.fail_address("bo@example.com");
        let mailer = world.mailer(transport.clone());

        let results = mailer
            .broadcast_to_admins("Disk almost full", "See dashboard.")
            .await
            .unwrap();

        // All three admins were attempted, regular users were not.
        assert_eq!(results.len(), 3);
        assert_eq!(
            results
                .iter()
                .filter(|(_, r)| r.is_delivered())
                .count(),
            2
        );
        assert_eq!(transport.sent().len() + 1, 3); // failed send is not in the sent log

        let records = world.failed_notifications.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, NotificationKind::AdminBroadcast);
    }

    #[tokio::test]
    async fn test_warning_failure_carries_action_hint() {
        let world = TestWorld::new();
        let author = world.add_user("Jo", "jo@example.com");
        let post = Post {
            id: uuid::Uuid::new_v4(),
            author_user_id: author.id,
            title: "Reported a lot".to_string(),
        };

        let mailer = world.mailer(FakeTransport::failing());

        let below = NotificationEvent::ReportWarning {
            user: author.clone(),
            post: post.clone(),
            report_count: 3,
        };
        let above = NotificationEvent::ReportWarning {
            user: author,
            post,
            report_count: 5,
        };

        assert_eq!(mailer.action_required(&below), Some("warning"));
        assert_eq!(
            mailer.action_required(&above),
            Some("account deactivation review")
        );

        mailer.dispatch(&above).await;
        let records = world.failed_notifications.records();
        assert_eq!(records[0].kind, NotificationKind::ReportWarning);
        assert_eq!(records[0].data["report_count"], json!(5));
    }
}
