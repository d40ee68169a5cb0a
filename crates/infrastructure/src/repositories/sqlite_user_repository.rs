use crate::database::{interact, query_error, users, SqlitePool};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::Sqlite;
use domain::{DomainError, User, UserRepository};
use tracing::debug;

// Database model
#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct UserModel {
    id: i32,
    username: String,
    password_hash: String,
}

#[derive(Insertable)]
#[diesel(table_name = users)]
struct NewUserModel {
    username: String,
    password_hash: String,
}

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User::new(model.id, model.username, model.password_hash)
    }
}

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let username = username.to_string();

        let result = interact(&self.pool, move |conn| {
            let query = users::table
                .filter(users::username.eq(username))
                .select(UserModel::as_select());
            debug!("{}", diesel::debug_query::<Sqlite, _>(&query));

            query.first::<UserModel>(conn).optional().map_err(query_error)
        })
        .await?;

        Ok(result.map(Into::into))
    }

    async fn save(&self, username: &str, password_hash: &str) -> Result<User, DomainError> {
        let new_user = NewUserModel {
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        };

        let result = interact(&self.pool, move |conn| {
            conn.transaction::<_, DieselError, _>(|conn| {
                diesel::insert_into(users::table)
                    .values(&new_user)
                    .execute(conn)?;
                debug!(username = %new_user.username, "INSERT INTO users");

                users::table
                    .filter(users::username.eq(&new_user.username))
                    .select(UserModel::as_select())
                    .first::<UserModel>(conn)
            })
            .map_err(|e| match e {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    DomainError::UsernameTaken(new_user.username.clone())
                }
                other => query_error(other),
            })
        })
        .await?;

        Ok(result.into())
    }
}
