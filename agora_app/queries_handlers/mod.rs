mod get_post_report_activity;
mod get_report_by_id;
mod list_reports;

pub use get_post_report_activity::GetPostReportActivityHandler;
pub use get_report_by_id::GetReportByIdHandler;
pub use list_reports::ListReportsHandler;
