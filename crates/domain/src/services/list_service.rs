use crate::entities::{Outcome, TodoList};
use crate::errors::DomainError;
use crate::repositories::{ListRepository, TodoRepository};
use crate::services::presentation::{
    overview_for_display, validate_list_name, validate_todo_name, ListDetail, ListOverview,
};
use std::sync::Arc;
use tracing::{debug, info};

/// List Service - every operation runs on behalf of one signed-in user
pub struct ListService {
    list_repository: Arc<dyn ListRepository>,
    todo_repository: Arc<dyn TodoRepository>,
}

impl ListService {
    pub fn new(
        list_repository: Arc<dyn ListRepository>,
        todo_repository: Arc<dyn TodoRepository>,
    ) -> Self {
        Self {
            list_repository,
            todo_repository,
        }
    }

    /// All lists of the user, open lists first
    pub async fn overview(&self, user_id: i32) -> Result<Vec<ListOverview>, DomainError> {
        let summaries = self.list_repository.find_summaries(user_id).await?;
        overview_for_display(summaries)
    }

    /// Resolve a list id the user owns
    pub async fn find_list(&self, user_id: i32, list_id: i32) -> Result<TodoList, DomainError> {
        self.list_repository
            .find_by_id(user_id, list_id)
            .await?
            .ok_or(DomainError::ListNotFound(list_id))
    }

    /// One list with its todos, open todos first
    pub async fn list_detail(&self, user_id: i32, list_id: i32) -> Result<ListDetail, DomainError> {
        let list = self.find_list(user_id, list_id).await?;
        let todos = self.todo_repository.find_by_list(list.id).await?;
        Ok(ListDetail::new(list, todos))
    }

    pub async fn create_list(&self, user_id: i32, raw_name: &str) -> Result<Outcome, DomainError> {
        let name = raw_name.trim();
        let existing = self.list_names(user_id, None).await?;

        if let Some(error) = validate_list_name(name, &existing) {
            debug!(user_id, %error, "rejected list name");
            return Ok(Outcome::failure(error));
        }

        let list = match self.list_repository.save(user_id, name).await {
            Ok(list) => list,
            Err(DomainError::Validation(error)) => return Ok(Outcome::failure(error)),
            Err(e) => return Err(e),
        };
        info!(user_id, list_id = list.id, "created list");
        Ok(Outcome::success("List created successfully."))
    }

    pub async fn rename_list(
        &self,
        user_id: i32,
        list_id: i32,
        raw_name: &str,
    ) -> Result<Outcome, DomainError> {
        let list = self.find_list(user_id, list_id).await?;
        let name = raw_name.trim();
        let existing = self.list_names(user_id, Some(list.id)).await?;

        if let Some(error) = validate_list_name(name, &existing) {
            debug!(user_id, list_id, %error, "rejected list rename");
            return Ok(Outcome::failure(error));
        }

        match self.list_repository.rename(user_id, list.id, name).await {
            Ok(()) => {}
            Err(DomainError::Validation(error)) => return Ok(Outcome::failure(error)),
            Err(e) => return Err(e),
        }
        info!(user_id, list_id, "renamed list");
        Ok(Outcome::success("List name has been updated."))
    }

    pub async fn delete_list(&self, user_id: i32, list_id: i32) -> Result<Outcome, DomainError> {
        self.list_repository.delete(user_id, list_id).await?;
        info!(user_id, list_id, "deleted list");
        Ok(Outcome::success("List has been deleted."))
    }

    pub async fn add_todo(
        &self,
        user_id: i32,
        list_id: i32,
        raw_name: &str,
    ) -> Result<Outcome, DomainError> {
        let list = self.find_list(user_id, list_id).await?;
        let name = raw_name.trim();

        if let Some(error) = validate_todo_name(name) {
            debug!(user_id, list_id, %error, "rejected todo name");
            return Ok(Outcome::failure(error));
        }

        let todo = self.todo_repository.save(list.id, name).await?;
        info!(user_id, list_id, todo_id = todo.id, "added todo");
        Ok(Outcome::success("Todo item was successfully added."))
    }

    pub async fn delete_todo(
        &self,
        user_id: i32,
        list_id: i32,
        todo_id: i32,
    ) -> Result<Outcome, DomainError> {
        let list = self.find_list(user_id, list_id).await?;
        self.todo_repository.delete(list.id, todo_id).await?;
        info!(user_id, list_id, todo_id, "deleted todo");
        Ok(Outcome::success("Todo item was successfully deleted."))
    }

    pub async fn set_todo_completed(
        &self,
        user_id: i32,
        list_id: i32,
        todo_id: i32,
        completed: bool,
    ) -> Result<Outcome, DomainError> {
        let list = self.find_list(user_id, list_id).await?;
        let todo = self
            .todo_repository
            .set_completed(list.id, todo_id, completed)
            .await?;

        let state = if todo.completed {
            "completed"
        } else {
            "not yet completed"
        };
        info!(user_id, list_id, todo_id, completed, "updated todo status");
        Ok(Outcome::success(format!(
            "\"{}\" has been marked as {}.",
            todo.name, state
        )))
    }

    pub async fn complete_all(&self, user_id: i32, list_id: i32) -> Result<Outcome, DomainError> {
        let list = self.find_list(user_id, list_id).await?;
        let changed = self.todo_repository.complete_all(list.id).await?;
        info!(user_id, list_id, changed, "completed all todos");
        Ok(Outcome::success("All todos have been updated."))
    }

    async fn list_names(&self, user_id: i32, except: Option<i32>) -> Result<Vec<String>, DomainError> {
        Ok(self
            .list_repository
            .find_summaries(user_id)
            .await?
            .into_iter()
            .filter(|summary| Some(summary.id) != except)
            .map(|summary| summary.name)
            .collect())
    }
}
