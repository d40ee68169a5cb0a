use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
}

impl TodoList {
    pub fn new(id: i32, user_id: i32, name: String) -> Self {
        Self { id, user_id, name }
    }
}

/// Row shape the storage layer returns for the overview page: the list plus
/// aggregate counts over its todos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSummary {
    pub id: i32,
    pub name: String,
    pub todos_count: i64,
    pub todos_remaining: i64,
}
