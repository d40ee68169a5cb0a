use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i32,
    pub list_id: i32,
    pub name: String,
    pub completed: bool,
}

impl Todo {
    pub fn new(id: i32, list_id: i32, name: String) -> Self {
        Self {
            id,
            list_id,
            name,
            completed: false,
        }
    }
}
