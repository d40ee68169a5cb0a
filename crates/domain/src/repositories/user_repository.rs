use crate::entities::User;
use crate::errors::DomainError;
use async_trait::async_trait;

/// Repository trait - defines what we need from persistence layer
/// This is a PORT in hexagonal architecture
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Fails with `UsernameTaken` when the name is already registered.
    async fn save(&self, username: &str, password_hash: &str) -> Result<User, DomainError>;
}
