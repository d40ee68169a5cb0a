// Database schema for the todo lists application
diesel::table! {
    users (id) {
        id -> Integer,
        username -> Text,          // Unique, letters/digits/underscore
        password_hash -> Text,     // argon2 PHC string
    }
}

diesel::table! {
    lists (id) {
        id -> Integer,
        user_id -> Integer,
        name -> Text,              // Unique per user
    }
}

diesel::table! {
    todos (id) {
        id -> Integer,
        list_id -> Integer,
        name -> Text,
        completed -> Bool,
    }
}

diesel::joinable!(lists -> users (user_id));
diesel::joinable!(todos -> lists (list_id));

diesel::allow_tables_to_appear_in_same_query!(users, lists, todos,);

/// Idempotent DDL run when the pool is opened.
pub const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS lists (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users (id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    UNIQUE (user_id, name)
);
CREATE TABLE IF NOT EXISTS todos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    list_id INTEGER NOT NULL REFERENCES lists (id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    completed BOOLEAN NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS todos_list_id_idx ON todos (list_id);
";
