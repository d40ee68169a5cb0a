use config::{Config, StorageBackend};
use domain::*;
use infrastructure::*;
use std::sync::Arc;
use tracing::info;

/// Todo Application - services wired to one storage backend
pub struct TodoApp {
    pub list_service: ListService,
    pub account_service: AccountService,
    backend: StorageBackend,
}

impl TodoApp {
    /// Build the application for whichever backend the configuration selects
    pub fn from_config(config: &Config) -> Result<Self, DomainError> {
        match config.storage_backend {
            StorageBackend::Sqlite => Self::sqlite(&config.database_path),
            StorageBackend::Memory => Ok(Self::in_memory()),
        }
    }

    /// Relational backend on a SQLite file (or `:memory:`)
    pub fn sqlite(database_path: &str) -> Result<Self, DomainError> {
        // Infrastructure layer - database setup
        let database = Database::new(database_path)?;
        let pool = database.get_pool().clone();

        // Create repository implementations
        let list_repository: Arc<dyn ListRepository> =
            Arc::new(SqliteListRepository::new(pool.clone()));
        let todo_repository: Arc<dyn TodoRepository> =
            Arc::new(SqliteTodoRepository::new(pool.clone()));
        let user_repository: Arc<dyn UserRepository> = Arc::new(SqliteUserRepository::new(pool));

        info!(database_path, "using sqlite storage");
        Ok(Self::assemble(
            StorageBackend::Sqlite,
            list_repository,
            todo_repository,
            user_repository,
        ))
    }

    /// Process-local backend; everything is gone on restart
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());

        info!("using in-memory storage");
        Self::assemble(
            StorageBackend::Memory,
            store.clone(),
            store.clone(),
            store,
        )
    }

    pub fn backend(&self) -> StorageBackend {
        self.backend
    }

    fn assemble(
        backend: StorageBackend,
        list_repository: Arc<dyn ListRepository>,
        todo_repository: Arc<dyn TodoRepository>,
        user_repository: Arc<dyn UserRepository>,
    ) -> Self {
        let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher::new());

        Self {
            list_service: ListService::new(list_repository, todo_repository),
            account_service: AccountService::new(user_repository, hasher),
            backend,
        }
    }
}
