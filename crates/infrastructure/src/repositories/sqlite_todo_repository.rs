use crate::database::{interact, lists, query_error, todos, SqlitePool};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::Sqlite;
use domain::{DomainError, Todo, TodoRepository};
use tracing::debug;

// Database model
#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = todos)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct TodoModel {
    id: i32,
    list_id: i32,
    name: String,
    completed: bool,
}

#[derive(Insertable)]
#[diesel(table_name = todos)]
struct NewTodoModel {
    list_id: i32,
    name: String,
    completed: bool,
}

impl From<TodoModel> for Todo {
    fn from(model: TodoModel) -> Self {
        Todo {
            id: model.id,
            list_id: model.list_id,
            name: model.name,
            completed: model.completed,
        }
    }
}

fn list_exists(conn: &mut SqliteConnection, list_id: i32) -> Result<bool, DomainError> {
    diesel::select(diesel::dsl::exists(lists::table.filter(lists::id.eq(list_id))))
        .get_result::<bool>(conn)
        .map_err(query_error)
}

/// Inserting under a list that is gone trips the `list_id` foreign key.
fn todo_write_error(e: DieselError, list_id: i32) -> DomainError {
    match e {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            DomainError::ListNotFound(list_id)
        }
        other => query_error(other),
    }
}

pub struct SqliteTodoRepository {
    pool: SqlitePool,
}

impl SqliteTodoRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoRepository for SqliteTodoRepository {
    async fn find_by_list(&self, list_id: i32) -> Result<Vec<Todo>, DomainError> {
        let result = interact(&self.pool, move |conn| {
            if !list_exists(conn, list_id)? {
                return Err(DomainError::ListNotFound(list_id));
            }

            let query = todos::table
                .filter(todos::list_id.eq(list_id))
                .order(todos::id.asc())
                .select(TodoModel::as_select());
            debug!("{}", diesel::debug_query::<Sqlite, _>(&query));

            query.load::<TodoModel>(conn).map_err(query_error)
        })
        .await?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, list_id: i32, todo_id: i32) -> Result<Option<Todo>, DomainError> {
        let result = interact(&self.pool, move |conn| {
            let query = todos::table
                .filter(todos::id.eq(todo_id))
                .filter(todos::list_id.eq(list_id))
                .select(TodoModel::as_select());
            debug!("{}", diesel::debug_query::<Sqlite, _>(&query));

            query.first::<TodoModel>(conn).optional().map_err(query_error)
        })
        .await?;

        Ok(result.map(Into::into))
    }

    async fn save(&self, list_id: i32, name: &str) -> Result<Todo, DomainError> {
        let new_todo = NewTodoModel {
            list_id,
            name: name.to_string(),
            completed: false,
        };

        let result = interact(&self.pool, move |conn| {
            conn.transaction::<_, DieselError, _>(|conn| {
                let insert = diesel::insert_into(todos::table).values(&new_todo);
                debug!("{}", diesel::debug_query::<Sqlite, _>(&insert));
                insert.execute(conn)?;

                // Get the last inserted row
                todos::table
                    .filter(todos::list_id.eq(new_todo.list_id))
                    .order(todos::id.desc())
                    .select(TodoModel::as_select())
                    .first::<TodoModel>(conn)
            })
            .map_err(|e| todo_write_error(e, list_id))
        })
        .await?;

        Ok(result.into())
    }

    async fn delete(&self, list_id: i32, todo_id: i32) -> Result<(), DomainError> {
        let deleted = interact(&self.pool, move |conn| {
            let delete = diesel::delete(
                todos::table
                    .filter(todos::id.eq(todo_id))
                    .filter(todos::list_id.eq(list_id)),
            );
            debug!("{}", diesel::debug_query::<Sqlite, _>(&delete));

            delete.execute(conn).map_err(query_error)
        })
        .await?;

        if deleted == 0 {
            return Err(DomainError::TodoNotFound(todo_id));
        }
        Ok(())
    }

    async fn set_completed(
        &self,
        list_id: i32,
        todo_id: i32,
        completed: bool,
    ) -> Result<Todo, DomainError> {
        let result = interact(&self.pool, move |conn| {
            let update = diesel::update(
                todos::table
                    .filter(todos::id.eq(todo_id))
                    .filter(todos::list_id.eq(list_id)),
            )
            .set(todos::completed.eq(completed));
            debug!("{}", diesel::debug_query::<Sqlite, _>(&update));

            if update.execute(conn).map_err(query_error)? == 0 {
                return Ok(None);
            }

            // Fetch the updated todo
            todos::table
                .filter(todos::id.eq(todo_id))
                .select(TodoModel::as_select())
                .first::<TodoModel>(conn)
                .optional()
                .map_err(query_error)
        })
        .await?;

        result
            .map(Into::into)
            .ok_or(DomainError::TodoNotFound(todo_id))
    }

    async fn complete_all(&self, list_id: i32) -> Result<usize, DomainError> {
        interact(&self.pool, move |conn| {
            if !list_exists(conn, list_id)? {
                return Err(DomainError::ListNotFound(list_id));
            }

            let update = diesel::update(
                todos::table
                    .filter(todos::list_id.eq(list_id))
                    .filter(todos::completed.eq(false)),
            )
            .set(todos::completed.eq(true));
            debug!("{}", diesel::debug_query::<Sqlite, _>(&update));

            update.execute(conn).map_err(query_error)
        })
        .await
    }
}
