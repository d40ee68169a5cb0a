use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("List not found with id: {0}")]
    ListNotFound(i32),

    #[error("Todo not found with id: {0}")]
    TodoNotFound(i32),

    #[error("Username already exists: {0}")]
    UsernameTaken(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Invalid todo counts: {remaining} remaining out of {count}")]
    InvalidCounts { count: i64, remaining: i64 },

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Password hashing error: {0}")]
    Hashing(String),
}

impl DomainError {
    /// Errors that mean "nothing here for you" rather than a broken request.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::ListNotFound(_) | DomainError::TodoNotFound(_))
    }

    /// Message safe to show to the person making the request.
    pub fn notice(&self) -> String {
        match self {
            DomainError::ListNotFound(_) => "The specified list was not found.".to_string(),
            DomainError::TodoNotFound(_) => "The specified todo was not found.".to_string(),
            DomainError::Validation(message) => message.clone(),
            DomainError::UsernameTaken(_) => "Username is already taken.".to_string(),
            DomainError::InvalidCredentials => "Invalid username or password.".to_string(),
            DomainError::Unauthenticated => "You must be signed in to do that.".to_string(),
            DomainError::InvalidCounts { .. }
            | DomainError::Repository(_)
            | DomainError::Hashing(_) => "Something went wrong.".to_string(),
        }
    }
}
