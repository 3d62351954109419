use agora_types::notification::NotificationEvent;
use agora_types::report::Report;

/// A message ready to hand to a transport.
#[derive(Debug, Clone)]
pub struct RenderedMail {
    pub subject: String,
    pub body: String,
}

/// Selects and renders the template for an event. Total over all kinds.
pub fn render(event: &NotificationEvent) -> RenderedMail {
    match event {
        NotificationEvent::ReportAccepted {
            reporter,
            post_title,
            report,
        } => RenderedMail {
            subject: "Your report has been upheld - Agora Community".to_string(),
            body: report_decision_body(
                &reporter.name,
                post_title,
                report,
                "Our moderation team has reviewed your report and upheld it.",
                "Appropriate action has been taken on the reported content in line with our community rules. Thank you for helping keep Agora a welcoming place.",
            ),
        },
        NotificationEvent::ReportRejected {
            reporter,
            post_title,
            report,
        } => RenderedMail {
            subject: "Your report was not upheld - Agora Community".to_string(),
            body: report_decision_body(
                &reporter.name,
                post_title,
                report,
                "Our moderation team has reviewed your report and decided not to uphold it.",
                "After careful review we determined that the content does not break our community rules. Even so, your vigilance is appreciated; please keep reporting anything that looks problematic.",
            ),
        },
        NotificationEvent::ReportWarning {
            user,
            post,
            report_count,
        } => RenderedMail {
            subject: "Warning about your content - Agora Community".to_string(),
            body: format!(
                r#"<!DOCTYPE html>
<html>
<body>
    <p>Hello <strong>{}</strong>,</p>
    <p>Your post "<strong>{}</strong>" has been reported {} times by other members of the community.</p>
    <p>Please review our community rules. Content that keeps being reported is
    examined by moderators and may be removed, and repeated violations can lead
    to your account being deactivated.</p>
    <p>Agora Community - Moderation team</p>
</body>
</html>"#,
                user.name, post.title, report_count
            ),
        },
        NotificationEvent::EmailVerification { user, verify_url } => RenderedMail {
            subject: "Verify your email address - Agora Community".to_string(),
            body: format!(
                r#"<!DOCTYPE html>
<html>
<body>
    <p>Hello <strong>{}</strong>,</p>
    <p>Welcome to Agora! Please confirm your email address by following this link:</p>
    <p><a href="{}">{}</a></p>
    <p>If you did not create an account, you can ignore this message.</p>
</body>
</html>"#,
                user.name, verify_url, verify_url
            ),
        },
        NotificationEvent::PasswordReset { user, reset_url } => RenderedMail {
            subject: "Reset your password - Agora Community".to_string(),
            body: format!(
                r#"<!DOCTYPE html>
<html>
<body>
    <p>Hello <strong>{}</strong>,</p>
    <p>We received a request to reset your password. You can choose a new one here:</p>
    <p><a href="{}">{}</a></p>
    <p>If you did not request this, you can ignore this message.</p>
</body>
</html>"#,
                user.name, reset_url, reset_url
            ),
        },
        NotificationEvent::AdminBroadcast { subject, body, .. } => RenderedMail {
            subject: format!("[ADMIN] {subject}"),
            body: body.clone(),
        },
    }
}

/// Shared shape of the two reporter-facing decision mails: greeting,
/// verdict line, report details (note only when present), closing line.
fn report_decision_body(
    reporter_name: &str,
    post_title: &str,
    report: &Report,
    verdict: &str,
    closing: &str,
) -> String {
    let note_block = match &report.admin_note {
        Some(note) => format!(
            "        <p><strong>Moderator note:</strong> {note}</p>\n"
        ),
        None => String::new(),
    };
    let decided_block = match report.resolved_at {
        Some(at) => format!(
            "        <p><strong>Decision date:</strong> {}</p>\n",
            at.format("%d/%m/%Y at %H:%M")
        ),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<body>
    <p>Hello <strong>{}</strong>,</p>
    <p>{}</p>
    <div>
        <h3>Report details</h3>
        <p><strong>Reported post:</strong> "{}"</p>
        <p><strong>Reason:</strong> {}</p>
        <p><strong>Reported on:</strong> {}</p>
{}{}    </div>
    <p>{}</p>
    <p>Agora Community - Moderation team<br>
    This is an automated message, please do not reply.</p>
</body>
</html>"#,
        reporter_name,
        verdict,
        post_title,
        report.reason.label(),
        report.created_at.format("%d/%m/%Y at %H:%M"),
        note_block,
        decided_block,
        closing,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_types::common::{Role, User};
    use agora_types::report::{ReportOutcome, ReportReason};
    use chrono::Utc;
    use uuid::Uuid;

    fn reporter() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Riley".to_string(),
            email: "riley@example.com".to_string(),
            role: Role::User,
        }
    }

    fn decided_report(note: Option<&str>) -> Report {
        let mut report = Report::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            ReportReason::Spam,
            None,
            Utc::now(),
        );
        report
            .decide(
                ReportOutcome::Rejected,
                Uuid::new_v4(),
                note.map(str::to_string),
                Utc::now(),
            )
            .unwrap();
        report
    }

    #[test]
    fn test_rejected_mail_surfaces_report_context() {
        let event = NotificationEvent::ReportRejected {
            reporter: reporter(),
            post_title: "Crochet patterns".to_string(),
            report: decided_report(Some("No violation found")),
        };
        let mail = render(&event);

        assert!(mail.subject.contains("not upheld"));
        assert!(mail.body.contains("Riley"));
        assert!(mail.body.contains("Crochet patterns"));
        assert!(mail.body.contains("Spam"));
        assert!(mail.body.contains("No violation found"));
        assert!(mail.body.contains("Decision date"));
    }

    #[test]
    fn test_note_block_omitted_when_absent() {
        let event = NotificationEvent::ReportAccepted {
            reporter: reporter(),
            post_title: "Crochet patterns".to_string(),
            report: decided_report(None),
        };
        let mail = render(&event);

        assert!(!mail.body.contains("Moderator note"));
    }

    #[test]
    fn test_verification_mail_carries_the_link() {
        let event = NotificationEvent::EmailVerification {
            user: reporter(),
            verify_url: "https://agora.community/verify/tok42".to_string(),
        };
        let mail = render(&event);

        assert!(mail.subject.contains("Verify"));
        assert!(mail.body.contains("https://agora.community/verify/tok42"));
    }

    #[test]
    fn test_admin_broadcast_prefixes_subject() {
        let event = NotificationEvent::AdminBroadcast {
            admin: reporter(),
            subject: "Disk almost full".to_string(),
            body: "See dashboard.".to_string(),
        };
        let mail = render(&event);

        assert_eq!(mail.subject, "[ADMIN] Disk almost full");
        assert_eq!(mail.body, "See dashboard.");
    }
}
