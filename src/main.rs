use anyhow::{Context, Result};
use docsum::{api, config, logging, processing::DocumentService};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_tracing();
    let config = Arc::new(config::load_config().context("failed to load configuration")?);
    let service = Arc::new(
        DocumentService::new(Arc::clone(&config)).context("failed to build summary service")?,
    );
    let app = api::create_router(service, Arc::clone(&config));

    let address = (config.server_host.as_str(), config.server_port);
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("failed to bind {}:{}", address.0, address.1))?;
    tracing::info!(
        host = %config.server_host,
        port = config.server_port,
        model = %config.ollama_model,
        "Listening on http://{}:{}",
        config.server_host,
        config.server_port
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server terminated unexpectedly")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
