pub mod memory_store;
pub mod sqlite_list_repository;
pub mod sqlite_todo_repository;
pub mod sqlite_user_repository;

pub use memory_store::InMemoryStore;
pub use sqlite_list_repository::SqliteListRepository;
pub use sqlite_todo_repository::SqliteTodoRepository;
pub use sqlite_user_repository::SqliteUserRepository;
