use uuid::Uuid;

use agora_types::{common::Post, errors::ApplicationError};

#[async_trait::async_trait]
pub trait PostRepository: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<Post, ApplicationError>;
}
