use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModerationError;

/// Why a post was flagged by a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportReason {
    Spam,
    Inappropriate,
    Harassment,
    Fake,
    Other,
}

impl ReportReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportReason::Spam => "spam",
            ReportReason::Inappropriate => "inappropriate",
            ReportReason::Harassment => "harassment",
            ReportReason::Fake => "fake",
            ReportReason::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "spam" => Some(ReportReason::Spam),
            "inappropriate" => Some(ReportReason::Inappropriate),
            "harassment" => Some(ReportReason::Harassment),
            "fake" => Some(ReportReason::Fake),
            "other" => Some(ReportReason::Other),
            _ => None,
        }
    }

    /// Human readable form, used in outgoing mail.
    pub fn label(&self) -> &'static str {
        match self {
            ReportReason::Spam => "Spam",
            ReportReason::Inappropriate => "Inappropriate content",
            ReportReason::Harassment => "Harassment",
            ReportReason::Fake => "False information",
            ReportReason::Other => "Other",
        }
    }
}

impl std::fmt::Display for ReportReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    Reviewed,
    Resolved,
    Rejected,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Reviewed => "reviewed",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(ReportStatus::Pending),
            "reviewed" => Some(ReportStatus::Reviewed),
            "resolved" => Some(ReportStatus::Resolved),
            "rejected" => Some(ReportStatus::Rejected),
            _ => None,
        }
    }

    /// Resolved and rejected reports cannot change state anymore.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReportStatus::Resolved | ReportStatus::Rejected)
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The administrator's verdict on a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportOutcome {
    /// Report upheld, action taken against the content.
    Resolved,
    /// Report dismissed.
    Rejected,
}

impl ReportOutcome {
    pub fn status(&self) -> ReportStatus {
        match self {
            ReportOutcome::Resolved => ReportStatus::Resolved,
            ReportOutcome::Rejected => ReportStatus::Rejected,
        }
    }
}

/// A user-submitted flag against a post, subject to administrator review.
///
/// Lifecycle: `Pending` on submission, optionally `Reviewed` while an
/// administrator is looking at it, then exactly one of `Resolved` or
/// `Rejected`. The decision fields (`admin_note`, `resolved_by`,
/// `resolved_at`) are only ever written together with the terminal status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: Uuid,
    pub post_id: Uuid,
    pub reporter_user_id: Uuid,
    pub reason: ReportReason,
    pub description: Option<String>,
    pub status: ReportStatus,
    pub admin_note: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Report {
    pub fn new(
        id: Uuid,
        post_id: Uuid,
        reporter_user_id: Uuid,
        reason: ReportReason,
        description: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            post_id,
            reporter_user_id,
            reason,
            description,
            status: ReportStatus::Pending,
            admin_note: None,
            resolved_at: None,
            resolved_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_decided(&self) -> bool {
        self.status.is_terminal()
    }

    /// Marks the report as seen by an administrator without deciding it.
    pub fn mark_reviewed(&mut self, now: DateTime<Utc>) -> Result<(), ModerationError> {
        if self.is_decided() {
            return Err(ModerationError::AlreadyDecided { report_id: self.id });
        }

        self.status = ReportStatus::Reviewed;
        self.updated_at = now;
        Ok(())
    }

    /// Applies an administrator decision.
    ///
    /// Status, note, resolver and resolution timestamp are set as one step;
    /// a second decision on the same report is an error, never a no-op.
    pub fn decide(
        &mut self,
        outcome: ReportOutcome,
        admin_id: Uuid,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<(), ModerationError> {
        if self.is_decided() {
            return Err(ModerationError::AlreadyDecided { report_id: self.id });
        }

        self.status = outcome.status();
        self.admin_note = note;
        self.resolved_by = Some(admin_id);
        self.resolved_at = Some(now);
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> Report {
        Report::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            ReportReason::Spam,
            Some("Repeated advertising".to_string()),
            Utc::now(),
        )
    }

    #[test]
    fn test_new_report_is_pending() {
        let report = sample_report();
        assert_eq!(report.status, ReportStatus::Pending);
        assert!(report.resolved_at.is_none());
        assert!(report.resolved_by.is_none());
    }

    #[test]
    fn test_decide_sets_all_resolution_fields() {
        let mut report = sample_report();
        let admin_id = Uuid::new_v4();
        let now = Utc::now();

        report
            .decide(
                ReportOutcome::Resolved,
                admin_id,
                Some("Post removed".to_string()),
                now,
            )
            .unwrap();

        assert_eq!(report.status, ReportStatus::Resolved);
        assert_eq!(report.resolved_by, Some(admin_id));
        assert_eq!(report.resolved_at, Some(now));
        assert_eq!(report.admin_note.as_deref(), Some("Post removed"));
    }

    #[test]
    fn test_decide_after_review() {
        let mut report = sample_report();
        report.mark_reviewed(Utc::now()).unwrap();
        assert_eq!(report.status, ReportStatus::Reviewed);

        report
            .decide(ReportOutcome::Rejected, Uuid::new_v4(), None, Utc::now())
            .unwrap();
        assert_eq!(report.status, ReportStatus::Rejected);
    }

    #[test]
    fn test_decide_twice_is_an_error() {
        let mut report = sample_report();
        let admin_id = Uuid::new_v4();

        report
            .decide(ReportOutcome::Rejected, admin_id, None, Utc::now())
            .unwrap();
        let snapshot = report.clone();

        let err = report
            .decide(ReportOutcome::Resolved, admin_id, None, Utc::now())
            .unwrap_err();
        assert!(matches!(err, ModerationError::AlreadyDecided { report_id } if report_id == report.id));
        // The failed attempt must not have touched the report.
        assert_eq!(report, snapshot);
    }

    #[test]
    fn test_review_after_decision_is_an_error() {
        let mut report = sample_report();
        report
            .decide(ReportOutcome::Resolved, Uuid::new_v4(), None, Utc::now())
            .unwrap();

        assert!(report.mark_reviewed(Utc::now()).is_err());
    }

    #[test]
    fn test_status_terminality() {
        assert!(!ReportStatus::Pending.is_terminal());
        assert!(!ReportStatus::Reviewed.is_terminal());
        assert!(ReportStatus::Resolved.is_terminal());
        assert!(ReportStatus::Rejected.is_terminal());
    }
}
