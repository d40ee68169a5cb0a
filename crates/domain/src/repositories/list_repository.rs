use crate::entities::{ListSummary, TodoList};
use crate::errors::DomainError;
use async_trait::async_trait;

/// Lists are always addressed through their owner: a list id belonging to
/// another user behaves exactly like a missing one.
#[async_trait]
pub trait ListRepository: Send + Sync {
    async fn find_by_id(&self, user_id: i32, list_id: i32) -> Result<Option<TodoList>, DomainError>;

    /// Every list of the user with todo counts, ordered by id.
    async fn find_summaries(&self, user_id: i32) -> Result<Vec<ListSummary>, DomainError>;

    async fn save(&self, user_id: i32, name: &str) -> Result<TodoList, DomainError>;

    async fn rename(&self, user_id: i32, list_id: i32, name: &str) -> Result<(), DomainError>;

    /// Removes the list together with its todos.
    async fn delete(&self, user_id: i32, list_id: i32) -> Result<(), DomainError>;
}
