use async_trait::async_trait;
use domain::{
    DomainError, ListRepository, ListSummary, Todo, TodoList, TodoRepository, User,
    UserRepository, NAME_TAKEN_ERROR,
};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug)]
struct StoredList {
    list: TodoList,
    todos: BTreeMap<i32, Todo>,
}

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<i32, User>,
    lists: BTreeMap<i32, StoredList>,
}

/// Process-local storage that keeps everything in memory.
///
/// Implements the same repository ports as the SQLite store; data is lost on
/// restart. Ids are `max + 1` within their collection, so a list's todo ids
/// start from 1.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn next_id<V>(map: &BTreeMap<i32, V>) -> i32 {
    map.keys().next_back().copied().unwrap_or(0) + 1
}

impl State {
    fn owned_list_mut(&mut self, user_id: i32, list_id: i32) -> Option<&mut StoredList> {
        self.lists
            .get_mut(&list_id)
            .filter(|stored| stored.list.user_id == user_id)
    }

    fn name_taken(&self, user_id: i32, name: &str, except: Option<i32>) -> bool {
        self.lists.values().any(|stored| {
            stored.list.user_id == user_id
                && stored.list.name == name
                && Some(stored.list.id) != except
        })
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn save(&self, username: &str, password_hash: &str) -> Result<User, DomainError> {
        let mut state = self.state.write().await;
        if state.users.values().any(|user| user.username == username) {
            return Err(DomainError::UsernameTaken(username.to_string()));
        }

        let user = User::new(
            next_id(&state.users),
            username.to_string(),
            password_hash.to_string(),
        );
        state.users.insert(user.id, user.clone());
        debug!(user_id = user.id, "stored user in memory");
        Ok(user)
    }
}

#[async_trait]
impl ListRepository for InMemoryStore {
    async fn find_by_id(&self, user_id: i32, list_id: i32) -> Result<Option<TodoList>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .lists
            .get(&list_id)
            .filter(|stored| stored.list.user_id == user_id)
            .map(|stored| stored.list.clone()))
    }

    async fn find_summaries(&self, user_id: i32) -> Result<Vec<ListSummary>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .lists
            .values()
            .filter(|stored| stored.list.user_id == user_id)
            .map(|stored| ListSummary {
                id: stored.list.id,
                name: stored.list.name.clone(),
                todos_count: stored.todos.len() as i64,
                todos_remaining: stored.todos.values().filter(|t| !t.completed).count() as i64,
            })
            .collect())
    }

    async fn save(&self, user_id: i32, name: &str) -> Result<TodoList, DomainError> {
        let mut state = self.state.write().await;
        if state.name_taken(user_id, name, None) {
            return Err(DomainError::Validation(NAME_TAKEN_ERROR.to_string()));
        }

        let list = TodoList::new(next_id(&state.lists), user_id, name.to_string());
        state.lists.insert(
            list.id,
            StoredList {
                list: list.clone(),
                todos: BTreeMap::new(),
            },
        );
        debug!(user_id, list_id = list.id, "stored list in memory");
        Ok(list)
    }

    async fn rename(&self, user_id: i32, list_id: i32, name: &str) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if state.name_taken(user_id, name, Some(list_id)) {
            return Err(DomainError::Validation(NAME_TAKEN_ERROR.to_string()));
        }

        let stored = state
            .owned_list_mut(user_id, list_id)
            .ok_or(DomainError::ListNotFound(list_id))?;
        stored.list.name = name.to_string();
        Ok(())
    }

    async fn delete(&self, user_id: i32, list_id: i32) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if state.owned_list_mut(user_id, list_id).is_none() {
            return Err(DomainError::ListNotFound(list_id));
        }
        state.lists.remove(&list_id);
        Ok(())
    }
}

#[async_trait]
impl TodoRepository for InMemoryStore {
    async fn find_by_list(&self, list_id: i32) -> Result<Vec<Todo>, DomainError> {
        let state = self.state.read().await;
        state
            .lists
            .get(&list_id)
            .map(|stored| stored.todos.values().cloned().collect())
            .ok_or(DomainError::ListNotFound(list_id))
    }

    async fn find_by_id(&self, list_id: i32, todo_id: i32) -> Result<Option<Todo>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .lists
            .get(&list_id)
            .and_then(|stored| stored.todos.get(&todo_id))
            .cloned())
    }

    async fn save(&self, list_id: i32, name: &str) -> Result<Todo, DomainError> {
        let mut state = self.state.write().await;
        let stored = state
            .lists
            .get_mut(&list_id)
            .ok_or(DomainError::ListNotFound(list_id))?;

        let todo = Todo::new(next_id(&stored.todos), list_id, name.to_string());
        stored.todos.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn delete(&self, list_id: i32, todo_id: i32) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        state
            .lists
            .get_mut(&list_id)
            .and_then(|stored| stored.todos.remove(&todo_id))
            .map(|_| ())
            .ok_or(DomainError::TodoNotFound(todo_id))
    }

    async fn set_completed(
        &self,
        list_id: i32,
        todo_id: i32,
        completed: bool,
    ) -> Result<Todo, DomainError> {
        let mut state = self.state.write().await;
        let todo = state
            .lists
            .get_mut(&list_id)
            .and_then(|stored| stored.todos.get_mut(&todo_id))
            .ok_or(DomainError::TodoNotFound(todo_id))?;

        todo.completed = completed;
        Ok(todo.clone())
    }

    async fn complete_all(&self, list_id: i32) -> Result<usize, DomainError> {
        let mut state = self.state.write().await;
        let stored = state
            .lists
            .get_mut(&list_id)
            .ok_or(DomainError::ListNotFound(list_id))?;

        let mut changed = 0;
        for todo in stored.todos.values_mut().filter(|todo| !todo.completed) {
            todo.completed = true;
            changed += 1;
        }
        Ok(changed)
    }
}
