use crate::database::{interact, query_error, lists, SqlitePool};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::{BigInt, Integer, Text};
use diesel::sqlite::Sqlite;
use domain::{DomainError, ListRepository, ListSummary, TodoList, NAME_TAKEN_ERROR};
use tracing::debug;

// Database model
#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = lists)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct ListModel {
    id: i32,
    user_id: i32,
    name: String,
}

#[derive(Insertable)]
#[diesel(table_name = lists)]
struct NewListModel {
    user_id: i32,
    name: String,
}

#[derive(QueryableByName, Debug)]
struct ListSummaryRow {
    #[diesel(sql_type = Integer)]
    id: i32,
    #[diesel(sql_type = Text)]
    name: String,
    #[diesel(sql_type = BigInt)]
    todos_count: i64,
    #[diesel(sql_type = BigInt)]
    todos_remaining: i64,
}

const LIST_SUMMARIES_SQL: &str = "
SELECT lists.id AS id, lists.name AS name,
       COUNT(todos.id) AS todos_count,
       COUNT(NULLIF(todos.completed, 1)) AS todos_remaining
  FROM lists
  LEFT JOIN todos ON todos.list_id = lists.id
 WHERE lists.user_id = ?
 GROUP BY lists.id, lists.name
 ORDER BY lists.id";

impl From<ListModel> for TodoList {
    fn from(model: ListModel) -> Self {
        TodoList::new(model.id, model.user_id, model.name)
    }
}

impl From<ListSummaryRow> for ListSummary {
    fn from(row: ListSummaryRow) -> Self {
        ListSummary {
            id: row.id,
            name: row.name,
            todos_count: row.todos_count,
            todos_remaining: row.todos_remaining,
        }
    }
}

/// A unique (user_id, name) violation means two requests raced past validation.
fn list_write_error(e: DieselError) -> DomainError {
    match e {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            DomainError::Validation(NAME_TAKEN_ERROR.to_string())
        }
        other => query_error(other),
    }
}

pub struct SqliteListRepository {
    pool: SqlitePool,
}

impl SqliteListRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ListRepository for SqliteListRepository {
    async fn find_by_id(&self, user_id: i32, list_id: i32) -> Result<Option<TodoList>, DomainError> {
        let result = interact(&self.pool, move |conn| {
            let query = lists::table
                .filter(lists::id.eq(list_id))
                .filter(lists::user_id.eq(user_id))
                .select(ListModel::as_select());
            debug!("{}", diesel::debug_query::<Sqlite, _>(&query));

            query.first::<ListModel>(conn).optional().map_err(query_error)
        })
        .await?;

        Ok(result.map(Into::into))
    }

    async fn find_summaries(&self, user_id: i32) -> Result<Vec<ListSummary>, DomainError> {
        let result = interact(&self.pool, move |conn| {
            debug!(user_id, "{}", LIST_SUMMARIES_SQL.trim());

            diesel::sql_query(LIST_SUMMARIES_SQL)
                .bind::<Integer, _>(user_id)
                .load::<ListSummaryRow>(conn)
                .map_err(query_error)
        })
        .await?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn save(&self, user_id: i32, name: &str) -> Result<TodoList, DomainError> {
        let new_list = NewListModel {
            user_id,
            name: name.to_string(),
        };

        let result = interact(&self.pool, move |conn| {
            conn.transaction::<_, DieselError, _>(|conn| {
                let insert = diesel::insert_into(lists::table).values(&new_list);
                debug!("{}", diesel::debug_query::<Sqlite, _>(&insert));
                insert.execute(conn)?;

                // Get the last inserted row
                lists::table
                    .filter(lists::user_id.eq(new_list.user_id))
                    .order(lists::id.desc())
                    .select(ListModel::as_select())
                    .first::<ListModel>(conn)
            })
            .map_err(list_write_error)
        })
        .await?;

        Ok(result.into())
    }

    async fn rename(&self, user_id: i32, list_id: i32, name: &str) -> Result<(), DomainError> {
        let name = name.to_string();

        let updated = interact(&self.pool, move |conn| {
            let update = diesel::update(
                lists::table
                    .filter(lists::id.eq(list_id))
                    .filter(lists::user_id.eq(user_id)),
            )
            .set(lists::name.eq(name));
            debug!("{}", diesel::debug_query::<Sqlite, _>(&update));

            update.execute(conn).map_err(list_write_error)
        })
        .await?;

        if updated == 0 {
            return Err(DomainError::ListNotFound(list_id));
        }
        Ok(())
    }

    async fn delete(&self, user_id: i32, list_id: i32) -> Result<(), DomainError> {
        let deleted = interact(&self.pool, move |conn| {
            let delete = diesel::delete(
                lists::table
                    .filter(lists::id.eq(list_id))
                    .filter(lists::user_id.eq(user_id)),
            );
            debug!("{}", diesel::debug_query::<Sqlite, _>(&delete));

            delete.execute(conn).map_err(query_error)
        })
        .await?;

        if deleted == 0 {
            return Err(DomainError::ListNotFound(list_id));
        }
        Ok(())
    }
}
