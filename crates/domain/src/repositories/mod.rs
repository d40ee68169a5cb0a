pub mod list_repository;
pub mod todo_repository;
pub mod user_repository;

pub use list_repository::ListRepository;
pub use todo_repository::TodoRepository;
pub use user_repository::UserRepository;
