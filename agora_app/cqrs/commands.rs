use uuid::Uuid;

use agora_types::{
    notification::NotificationEvent,
    report::{Report, ReportOutcome, ReportReason},
};

use crate::cqrs::Command;

/// A user flags a post for moderation.
#[derive(Debug, Clone)]
pub struct SubmitReport {
    pub id: Uuid,
    pub post_id: Uuid,
    pub reporter_user_id: Uuid,
    pub reason: ReportReason,
    pub description: Option<String>,
}

impl Command for SubmitReport {
    type Output = Report;
}

/// An administrator marks a pending report as being looked at.
#[derive(Debug, Clone)]
pub struct ReviewReport {
    pub report_id: Uuid,
    pub admin_user_id: Uuid,
}

impl Command for ReviewReport {
    type Output = Report;
}

/// An administrator decides a report.
///
/// The handler returns the single notification event addressed to the
/// reporter; dispatching it is the caller's job, after the transaction
/// has committed.
#[derive(Debug, Clone)]
pub struct DecideReport {
    pub report_id: Uuid,
    pub admin_user_id: Uuid,
    pub outcome: ReportOutcome,
    pub note: Option<String>,
}

impl Command for DecideReport {
    type Output = NotificationEvent;
}
