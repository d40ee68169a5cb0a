use crate::entities::Todo;
use crate::errors::DomainError;
use async_trait::async_trait;

/// Callers resolve list ownership before reaching this repository.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Todos of a list, ordered by id.
    async fn find_by_list(&self, list_id: i32) -> Result<Vec<Todo>, DomainError>;
    async fn find_by_id(&self, list_id: i32, todo_id: i32) -> Result<Option<Todo>, DomainError>;
    async fn save(&self, list_id: i32, name: &str) -> Result<Todo, DomainError>;
    async fn delete(&self, list_id: i32, todo_id: i32) -> Result<(), DomainError>;
    async fn set_completed(
        &self,
        list_id: i32,
        todo_id: i32,
        completed: bool,
    ) -> Result<Todo, DomainError>;
    /// Returns how many todos were changed.
    async fn complete_all(&self, list_id: i32) -> Result<usize, DomainError>;
}
