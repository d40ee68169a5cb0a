use application::TodoApp;
use axum::{
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod handlers;
pub mod render;
pub mod session;

use handlers::{auth, lists, todos};
use render::redirect;
use session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub todo_app: Arc<TodoApp>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(todo_app: Arc<TodoApp>, session_ttl: Duration) -> Self {
        Self {
            todo_app,
            sessions: Arc::new(SessionStore::new(session_ttl)),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        // Credentials
        .route("/signup", get(auth::signup_form).post(auth::sign_up))
        .route("/login", get(auth::login_form).post(auth::log_in))
        .route("/signout", get(auth::sign_out))
        // Lists
        .route("/lists", get(lists::overview).post(lists::create_list))
        .route("/lists/new", get(lists::new_list_form))
        .route("/lists/:list_id", get(lists::show_list).post(lists::rename_list))
        .route("/lists/:list_id/edit", get(lists::edit_list))
        .route("/lists/:list_id/delete", post(lists::delete_list))
        // Todos
        .route("/lists/:list_id/todos", post(todos::add_todo))
        .route("/lists/:list_id/todos/:todo_id", post(todos::set_completed))
        .route("/lists/:list_id/todos/:todo_id/delete", post(todos::delete_todo))
        .route("/lists/:list_id/todo_all", post(todos::complete_all))
        .fallback(root)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the router until ctrl-c.
pub async fn serve(bind_address: &str, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    info!("🌐 Todo lists listening on http://{}", bind_address);
    info!("   GET  /lists                          - Lists of the signed-in user");
    info!("   POST /lists                          - Create list");
    info!("   GET  /lists/:id                      - List with its todos");
    info!("   POST /lists/:id/todos                - Add todo");
    info!("   POST /signup, /login; GET /signout   - Accounts");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("👋 Shutting down");
    }
}

async fn root() -> Response {
    redirect("/lists", None)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
