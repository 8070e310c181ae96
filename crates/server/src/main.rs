use anyhow::{Context, Result};
use common::{init_structured_logging, LoggingConfig};
use server::{build_state, router, Dependencies, ServerConfig};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_structured_logging(LoggingConfig::from_env())?;

    let config = ServerConfig::from_env().context("Invalid configuration")?;
    info!(?config, ai_enabled = config.ai_enabled(), "Starting sales dashboard API");

    let deps = Dependencies::from_config(&config)?;
    let state = build_state(&config, deps).await?;
    let app = router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!(%address, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
