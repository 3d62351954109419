use uuid::Uuid;

use agora_types::{
    common::{Post, User},
    report::{Report, ReportStatus},
};

use crate::cqrs::Query;

/// Fetch a single report by id.
pub struct GetReportById {
    pub report_id: Uuid,
}

impl Query for GetReportById {
    type Output = Report;
}

/// List reports, newest first, optionally filtered by status.
pub struct ListReports {
    pub status: Option<ReportStatus>,
    pub limit: i64,
}

impl Query for ListReports {
    type Output = Vec<Report>;
}

/// How much reporting a post has attracted, and who would be warned about it.
#[derive(Debug, Clone)]
pub struct PostReportActivity {
    pub post: Post,
    pub author: User,
    pub report_count: i64,
}

pub struct GetPostReportActivity {
    pub post_id: Uuid,
}

impl Query for GetPostReportActivity {
    type Output = PostReportActivity;
}
