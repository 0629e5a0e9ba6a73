//! Advisor server binary

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use advisor_server::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::args().nth(1);
    let settings = advisor_config::load_settings(config_path.as_deref())?;

    let catalog = Arc::new(advisor_catalog::sample_catalog());
    tracing::info!("catalog loaded with {} products", catalog.len());

    let state = AppState::new(settings.clone(), catalog);
    let _cleanup = state.sessions.start_cleanup_task();

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("advisor server listening on {}", addr);

    axum::serve(listener, create_router(state)).await?;

    Ok(())
}
