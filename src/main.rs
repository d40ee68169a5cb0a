use api_server::AppState;
use application::TodoApp;
use config::Config;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; RUST_LOG overrides the default filter
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("todo_lists=info,api_server=debug,domain=info,infrastructure=info,tower_http=debug")
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🚀 Starting todo lists");

    // Load configuration from environment variables
    let config = Config::from_env(None)?;
    info!("💾 Storage backend: {}", config.storage_backend);
    info!("🗄️  Database: {}", config.database_path);
    info!("🌐 API server will bind to: {}", config.api_address());
    info!("🔑 Sessions expire after {}s", config.session_ttl.as_secs());

    let todo_app = Arc::new(TodoApp::from_config(&config)?);
    api_server::serve(&config.api_address(), AppState::new(todo_app, config.session_ttl)).await?;

    Ok(())
}
