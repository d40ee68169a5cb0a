pub mod database;
pub mod repositories;
pub mod security;

pub use database::{Database, SqlitePool};
pub use repositories::*;
pub use security::*;
