mod failed_notification_repository;
mod post_repository;
mod report_repository;
mod user_repository;

pub use failed_notification_repository::PostgresFailedNotificationRepository;
pub use post_repository::PostgresPostRepository;
pub use report_repository::PostgresReportRepository;
pub use user_repository::PostgresUserRepository;
