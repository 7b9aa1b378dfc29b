use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::users::user::User;

#[derive(thiserror::Error, Debug)]
pub enum CreateUserError {
    #[error("user already exists")]
    Conflict,
    #[error("failed to persist user")]
    Storage(#[source] anyhow::Error),
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, CreateUserError>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
}
