#[cfg(not(tarpaulin_include))]
pub mod tests {
    use async_trait::async_trait;
    use chrono::Utc;
    use std::{
        collections::{HashMap, HashSet},
        sync::{Arc, Mutex},
    };
    use uuid::Uuid;

    use agora_types::{
        common::{Post, Role, User},
        errors::{ApplicationError, DbError},
        report::{Report, ReportOutcome, ReportReason, ReportStatus},
    };

    use crate::{
        app_bus::AppBus,
        config::Config,
        cqrs::commands::SubmitReport,
        mailer::{MailTransport, Mailer, TransportError},
        moderation::ModerationService,
        repository::{
            FailedNotificationRepository, NewFailedNotification, PostRepository, ReportRepository,
            UserRepository,
        },
        uow::{UnitOfWork, UnitOfWorkProvider},
    };

    #[derive(Default, Clone)]
    pub struct MockReportRepository {
        reports: Arc<Mutex<HashMap<Uuid, Report>>>,
    }

    impl MockReportRepository {
        pub fn get(&self, id: Uuid) -> Report {
            self.reports.lock().unwrap().get(&id).unwrap().clone()
        }

        pub fn insert(&self, report: Report) {
            self.reports.lock().unwrap().insert(report.id, report);
        }
    }

    #[async_trait]
    impl ReportRepository for MockReportRepository {
        async fn add(&self, report: &Report) -> Result<(), ApplicationError> {
            self.insert(report.clone());
            Ok(())
        }

        async fn save(&self, report: &Report) -> Result<(), ApplicationError> {
            self.insert(report.clone());
            Ok(())
        }

        async fn get_by_id(&self, id: Uuid) -> Result<Report, ApplicationError> {
            let reports = self.reports.lock().unwrap();
            reports
                .get(&id)
                .cloned()
                .ok_or_else(|| ApplicationError::Db(DbError::ReportByIdNotFound(id)))
        }

        async fn find_by_post_and_reporter(
            &self,
            post_id: Uuid,
            reporter_user_id: Uuid,
        ) -> Result<Option<Report>, ApplicationError> {
            let reports = self.reports.lock().unwrap();
            Ok(reports
                .values()
                .find(|r| r.post_id == post_id && r.reporter_user_id == reporter_user_id)
                .cloned())
        }

        async fn list(
            &self,
            status: Option<ReportStatus>,
            limit: i64,
        ) -> Result<Vec<Report>, ApplicationError> {
            let reports = self.reports.lock().unwrap();
            let mut found: Vec<Report> = reports
                .values()
                .filter(|r| status.is_none_or(|s| r.status == s))
                .cloned()
                .collect();
            found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            found.truncate(limit as usize);
            Ok(found)
        }

        async fn count_for_post(&self, post_id: Uuid) -> Result<i64, ApplicationError> {
            let reports = self.reports.lock().unwrap();
            Ok(reports.values().filter(|r| r.post_id == post_id).count() as i64)
        }
    }

    #[derive(Default, Clone)]
    pub struct MockUserRepository {
        users: Arc<Mutex<HashMap<Uuid, User>>>,
    }

    impl MockUserRepository {
        pub fn insert(&self, user: User) {
            self.users.lock().unwrap().insert(user.id, user);
        }
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn get_by_id(&self, id: Uuid) -> Result<User, ApplicationError> {
            let users = self.users.lock().unwrap();
            users
                .get(&id)
                .cloned()
                .ok_or_else(|| ApplicationError::Db(DbError::UserByIdNotFound(id)))
        }

        async fn list_admins(&self) -> Result<Vec<User>, ApplicationError> {
            let users = self.users.lock().unwrap();
            let mut admins: Vec<User> = users.values().filter(|u| u.is_admin()).cloned().collect();
            admins.sort_by(|a, b| a.email.cmp(&b.email));
            Ok(admins)
        }
    }

    #[derive(Default, Clone)]
    pub struct MockPostRepository {
        posts: Arc<Mutex<HashMap<Uuid, Post>>>,
    }

    impl MockPostRepository {
        pub fn insert(&self, post: Post) {
            self.posts.lock().unwrap().insert(post.id, post);
        }
    }

    #[async_trait]
    impl PostRepository for MockPostRepository {
        async fn get_by_id(&self, id: Uuid) -> Result<Post, ApplicationError> {
            let posts = self.posts.lock().unwrap();
            posts
                .get(&id)
                .cloned()
                .ok_or_else(|| ApplicationError::Db(DbError::PostByIdNotFound(id)))
        }
    }

    #[derive(Default, Clone)]
    pub struct MockFailedNotificationRepository {
        records: Arc<Mutex<Vec<NewFailedNotification>>>,
        fail_writes: Arc<Mutex<bool>>,
    }

    impl MockFailedNotificationRepository {
        pub fn records(&self) -> Vec<NewFailedNotification> {
            self.records.lock().unwrap().clone()
        }

        /// Simulate the ledger itself being unavailable.
        pub fn fail_writes(&self) {
            *self.fail_writes.lock().unwrap() = true;
        }
    }

    #[async_trait]
    impl FailedNotificationRepository for MockFailedNotificationRepository {
        async fn add(&self, record: &NewFailedNotification) -> Result<(), ApplicationError> {
            if *self.fail_writes.lock().unwrap() {
                return Err(ApplicationError::Unknown(
                    "ledger unavailable".to_string(),
                ));
            }
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    #[derive(Clone)]
    pub struct MockUnitOfWork {
        pub reports: MockReportRepository,
        pub users: MockUserRepository,
        pub posts: MockPostRepository,
        pub failed_notifications: MockFailedNotificationRepository,
    }

    #[async_trait]
    impl<'a> UnitOfWork<'a> for MockUnitOfWork {
        fn reports(&self) -> Arc<dyn ReportRepository + 'a> {
            Arc::new(self.reports.clone())
        }

        fn users(&self) -> Arc<dyn UserRepository + 'a> {
            Arc::new(self.users.clone())
        }

        fn posts(&self) -> Arc<dyn PostRepository + 'a> {
            Arc::new(self.posts.clone())
        }

        fn failed_notifications(&self) -> Arc<dyn FailedNotificationRepository + 'a> {
            Arc::new(self.failed_notifications.clone())
        }

        async fn commit(self: Box<Self>) -> Result<(), ApplicationError> {
            Ok(())
        }

        async fn rollback(self: Box<Self>) -> Result<(), ApplicationError> {
            Ok(())
        }
    }

    #[derive(Clone)]
    pub struct MockUnitOfWorkProvider {
        uow: MockUnitOfWork,
    }

    #[async_trait]
    impl UnitOfWorkProvider for MockUnitOfWorkProvider {
        async fn begin<'p>(&'p self) -> Result<Box<dyn UnitOfWork<'p> + 'p>, ApplicationError> {
            Ok(Box::new(self.uow.clone()))
        }
    }

    #[derive(Debug, Clone)]
    pub struct SentMail {
        pub to: String,
        pub subject: String,
        pub body: String,
    }

    /// In-memory transport with scripted failures. Successful sends are
    /// appended to a log; failed ones are not.
    #[derive(Default, Clone)]
    pub struct FakeTransport {
        fail_all: bool,
        fail_addresses: Arc<Mutex<HashSet<String>>>,
        sent: Arc<Mutex<Vec<SentMail>>>,
    }

    impl FakeTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing() -> Self {
            Self {
                fail_all: true,
                ..Self::default()
            }
        }

        pub fn fail_address(&self, address: &str) {
            self.fail_addresses
                .lock()
                .unwrap()
                .insert(address.to_string());
        }

        pub fn sent(&self) -> Vec<SentMail> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MailTransport for FakeTransport {
        async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), TransportError> {
            if self.fail_all || self.fail_addresses.lock().unwrap().contains(to) {
                return Err(TransportError("simulated outage".to_string()));
            }

            self.sent.lock().unwrap().push(SentMail {
                to: to.to_string(),
                subject: subject.to_string(),
                body: body.to_string(),
            });
            Ok(())
        }
    }

    /// Shared fixture: one set of in-memory repositories plus helpers to
    /// wire buses, mailers and the moderation service on top of them.
    pub struct TestWorld {
        pub reports: MockReportRepository,
        pub users: MockUserRepository,
        pub posts: MockPostRepository,
        pub failed_notifications: MockFailedNotificationRepository,
        config: Arc<Config>,
    }

    impl TestWorld {
        pub fn new() -> Self {
            Self {
                reports: MockReportRepository::default(),
                users: MockUserRepository::default(),
                posts: MockPostRepository::default(),
                failed_notifications: MockFailedNotificationRepository::default(),
                config: Arc::new(Config {
                    mail_from: "noreply@agora.test".to_string(),
                    report_warn_threshold: 3,
                    deactivation_threshold: 5,
                }),
            }
        }

        pub fn config(&self) -> Arc<Config> {
            self.config.clone()
        }

        fn mock_uow(&self) -> MockUnitOfWork {
            MockUnitOfWork {
                reports: self.reports.clone(),
                users: self.users.clone(),
                posts: self.posts.clone(),
                failed_notifications: self.failed_notifications.clone(),
            }
        }

        pub fn uow(&self) -> Box<dyn UnitOfWork<'static> + 'static> {
            Box::new(self.mock_uow())
        }

        pub fn uow_provider(&self) -> Arc<dyn UnitOfWorkProvider> {
            Arc::new(MockUnitOfWorkProvider {
                uow: self.mock_uow(),
            })
        }

        pub fn app_bus(&self) -> Arc<AppBus> {
            Arc::new(AppBus::new(self.config.clone(), self.uow_provider()))
        }

        pub fn mailer(&self, transport: FakeTransport) -> Mailer {
            Mailer::new(Arc::new(transport), self.uow_provider(), self.config.clone())
        }

        pub fn moderation(&self, transport: FakeTransport) -> ModerationService {
            ModerationService::new(
                self.app_bus(),
                Arc::new(self.mailer(transport)),
                self.config.clone(),
            )
        }

        pub fn add_user(&self, name: &str, email: &str) -> User {
            let user = User {
                id: Uuid::new_v4(),
                name: name.to_string(),
                email: email.to_string(),
                role: Role::User,
            };
            self.users.insert(user.clone());
            user
        }

        pub fn add_admin(&self, name: &str, email: &str) -> User {
            let user = User {
                id: Uuid::new_v4(),
                name: name.to_string(),
                email: email.to_string(),
                role: Role::Admin,
            };
            self.users.insert(user.clone());
            user
        }

        pub fn add_post(&self, title: &str) -> Post {
            let author = self.add_user("Author", &format!("author+{}@example.com", Uuid::new_v4()));
            self.add_post_by(&author, title)
        }

        pub fn add_post_by(&self, author: &User, title: &str) -> Post {
            let post = Post {
                id: Uuid::new_v4(),
                author_user_id: author.id,
                title: title.to_string(),
            };
            self.posts.insert(post.clone());
            post
        }

        pub fn add_report(&self, post: &Post, reporter: &User, reason: ReportReason) -> Report {
            let report = Report::new(
                Uuid::new_v4(),
                post.id,
                reporter.id,
                reason,
                None,
                Utc::now(),
            );
            self.reports.insert(report.clone());
            report
        }

        pub fn add_decided_report(&self, post: &Post, reporter: &User, admin: &User) -> Report {
            let mut report = self.add_report(post, reporter, ReportReason::Spam);
            report
                .decide(
                    ReportOutcome::Resolved,
                    admin.id,
                    Some("Handled".to_string()),
                    Utc::now(),
                )
                .unwrap();
            self.reports.insert(report.clone());
            report
        }
    }

    pub fn submit_report_command(
        post_id: Uuid,
        reporter_user_id: Uuid,
        reason: ReportReason,
    ) -> SubmitReport {
        SubmitReport {
            id: Uuid::new_v4(),
            post_id,
            reporter_user_id,
            reason,
            description: None,
        }
    }
}
