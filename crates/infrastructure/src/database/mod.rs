use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};
use domain::DomainError;
use tracing::info;

pub mod schema;
pub use schema::*;

pub type SqlitePool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

/// Applied to every pooled connection: cascading deletes need foreign keys,
/// and concurrent writers wait instead of failing with SQLITE_BUSY.
#[derive(Debug, Clone, Copy)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(r2d2::Error::QueryError)
    }
}

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (or create) the SQLite database and make sure the schema exists.
    ///
    /// `:memory:` gets a single-connection pool, since every SQLite
    /// connection to `:memory:` is a separate database.
    pub fn new(database_path: &str) -> Result<Self, DomainError> {
        let manager = ConnectionManager::<SqliteConnection>::new(database_path);
        let max_size = if database_path == ":memory:" { 1 } else { 8 };

        let pool = r2d2::Pool::builder()
            .max_size(max_size)
            .connection_customizer(Box::new(SqlitePragmas))
            .build(manager)
            .map_err(|e| DomainError::Repository(format!("Failed to create SQLite pool: {}", e)))?;

        let mut conn = pool.get().map_err(query_error)?;
        conn.batch_execute(CREATE_TABLES).map_err(query_error)?;
        info!(database_path, "database schema ready");

        Ok(Database { pool })
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }
}

pub(crate) fn query_error<E: std::fmt::Display>(e: E) -> DomainError {
    DomainError::Repository(e.to_string())
}

/// Check out a connection and run blocking diesel work off the async runtime.
pub(crate) async fn interact<T, F>(pool: &SqlitePool, work: F) -> Result<T, DomainError>
where
    T: Send + 'static,
    F: FnOnce(&mut SqliteConnection) -> Result<T, DomainError> + Send + 'static,
{
    let mut conn = pool.get().map_err(query_error)?;

    tokio::task::spawn_blocking(move || work(&mut *conn))
        .await
        .map_err(query_error)?
}
