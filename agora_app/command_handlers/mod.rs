mod decide_report;
mod review_report;
mod submit_report;

pub use decide_report::DecideReportCommandHandler;
pub use review_report::ReviewReportCommandHandler;
pub use submit_report::SubmitReportCommandHandler;
