use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{Post, User};
use crate::report::Report;

/// Tag identifying a notification family in logs and the failure ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ReportAccepted,
    ReportRejected,
    ReportWarning,
    EmailVerification,
    PasswordReset,
    AdminBroadcast,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::ReportAccepted => "report_accepted",
            NotificationKind::ReportRejected => "report_rejected",
            NotificationKind::ReportWarning => "report_warning",
            NotificationKind::EmailVerification => "email_verification",
            NotificationKind::PasswordReset => "password_reset",
            NotificationKind::AdminBroadcast => "admin_broadcast",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A domain event that should reach a user by mail.
///
/// Events are ephemeral: they exist between the moment a decision is
/// committed and the delivery attempt, and are only persisted (as a
/// failed-notification row) when delivery fails.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    /// The reporter's flag was upheld by moderation.
    ReportAccepted {
        reporter: User,
        post_title: String,
        report: Report,
    },
    /// The reporter's flag was dismissed by moderation.
    ReportRejected {
        reporter: User,
        post_title: String,
        report: Report,
    },
    /// A post author whose content keeps getting reported.
    ReportWarning {
        user: User,
        post: Post,
        report_count: i64,
    },
    EmailVerification {
        user: User,
        verify_url: String,
    },
    PasswordReset {
        user: User,
        reset_url: String,
    },
    AdminBroadcast {
        admin: User,
        subject: String,
        body: String,
    },
}

impl NotificationEvent {
    pub fn kind(&self) -> NotificationKind {
        match self {
            NotificationEvent::ReportAccepted { .. } => NotificationKind::ReportAccepted,
            NotificationEvent::ReportRejected { .. } => NotificationKind::ReportRejected,
            NotificationEvent::ReportWarning { .. } => NotificationKind::ReportWarning,
            NotificationEvent::EmailVerification { .. } => NotificationKind::EmailVerification,
            NotificationEvent::PasswordReset { .. } => NotificationKind::PasswordReset,
            NotificationEvent::AdminBroadcast { .. } => NotificationKind::AdminBroadcast,
        }
    }

    pub fn recipient(&self) -> &User {
        match self {
            NotificationEvent::ReportAccepted { reporter, .. }
            | NotificationEvent::ReportRejected { reporter, .. } => reporter,
            NotificationEvent::ReportWarning { user, .. }
            | NotificationEvent::EmailVerification { user, .. }
            | NotificationEvent::PasswordReset { user, .. } => user,
            NotificationEvent::AdminBroadcast { admin, .. } => admin,
        }
    }

    /// Report this event originates from, when there is one.
    pub fn report(&self) -> Option<&Report> {
        match self {
            NotificationEvent::ReportAccepted { report, .. }
            | NotificationEvent::ReportRejected { report, .. } => Some(report),
            _ => None,
        }
    }

    pub fn report_id(&self) -> Option<Uuid> {
        self.report().map(|report| report.id)
    }

    /// Post this event is about, when there is one.
    pub fn post_id(&self) -> Option<Uuid> {
        match self {
            NotificationEvent::ReportAccepted { report, .. }
            | NotificationEvent::ReportRejected { report, .. } => Some(report.post_id),
            NotificationEvent::ReportWarning { post, .. } => Some(post.id),
            _ => None,
        }
    }
}
