pub mod account_service;
pub mod list_service;
pub mod presentation;

pub use account_service::{AccountService, PasswordHasher};
pub use list_service::ListService;
pub use presentation::*;
