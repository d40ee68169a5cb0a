pub mod auth;
pub mod lists;
pub mod todos;
