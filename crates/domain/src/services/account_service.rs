use crate::entities::{Outcome, User};
use crate::errors::DomainError;
use crate::repositories::UserRepository;
use std::sync::Arc;
use tracing::{info, warn};

/// Password hashing port; the algorithm lives in infrastructure.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// `Ok(false)` on mismatch; `Err` only when `hash` is unreadable.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError>;
}

/// Account Service - sign up and credential checks
pub struct AccountService {
    user_repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AccountService {
    pub fn new(user_repository: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            user_repository,
            hasher,
        }
    }

    /// Register a new account; a rejected signup comes back as a failed outcome
    pub async fn sign_up(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(Option<User>, Outcome), DomainError> {
        let username = username.trim();

        if !User::is_valid_username(username) {
            return Ok((
                None,
                Outcome::failure("Username must contain only letters, numbers, and underscores."),
            ));
        }
        if password.is_empty() {
            return Ok((None, Outcome::failure("Password cannot be empty.")));
        }
        if self.user_repository.find_by_username(username).await?.is_some() {
            return Ok((None, Outcome::failure(DomainError::UsernameTaken(username.to_string()).notice())));
        }

        let hash = self.hasher.hash(password)?;
        let user = match self.user_repository.save(username, &hash).await {
            Ok(user) => user,
            Err(e @ DomainError::UsernameTaken(_)) => return Ok((None, Outcome::failure(e.notice()))),
            Err(e) => return Err(e),
        };

        info!(user_id = user.id, username = %user.username, "signed up");
        let welcome = format!("Welcome, {}!", user.username);
        Ok((Some(user), Outcome::success(welcome)))
    }

    pub async fn find_user_id(&self, username: &str) -> Result<Option<i32>, DomainError> {
        Ok(self
            .user_repository
            .find_by_username(username)
            .await?
            .map(|user| user.id))
    }

    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<bool, DomainError> {
        match self.sign_in(username, password).await {
            Ok(_) => Ok(true),
            Err(DomainError::InvalidCredentials) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn sign_in(&self, username: &str, password: &str) -> Result<User, DomainError> {
        let Some(user) = self.user_repository.find_by_username(username.trim()).await? else {
            warn!(username, "sign in for unknown user");
            return Err(DomainError::InvalidCredentials);
        };

        if self.hasher.verify(password, &user.password_hash)? {
            info!(user_id = user.id, "signed in");
            Ok(user)
        } else {
            warn!(user_id = user.id, "sign in with wrong password");
            Err(DomainError::InvalidCredentials)
        }
    }
}
