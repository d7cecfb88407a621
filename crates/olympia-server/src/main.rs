#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::sync::Arc;

use olympia_server::config::ServerConfig;
use olympia_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing logger
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,olympia_server=debug".into()),
        )
        .with_target(false)
        .with_line_number(true)
        .init();

    tracing::info!("Starting Olympia chat relay");

    let config = ServerConfig::load()?;
    let state = Arc::new(AppState::new(&config));

    let app = olympia_server::router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(model = %config.model, "Olympia running on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
