use uuid::Uuid;

use agora_types::{common::User, errors::ApplicationError};

#[async_trait::async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<User, ApplicationError>;

    /// All administrator accounts, for admin-wide notifications.
    async fn list_admins(&self) -> Result<Vec<User>, ApplicationError>;
}
