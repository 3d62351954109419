mod failed_notification_repository;
mod post_repository;
mod report_repository;
mod user_repository;

pub use failed_notification_repository::{FailedNotificationRepository, NewFailedNotification};
pub use post_repository::PostRepository;
pub use report_repository::ReportRepository;
pub use user_repository::UserRepository;
