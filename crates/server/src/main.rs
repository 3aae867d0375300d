// crates/server/src/main.rs
//! dmphq server binary.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dmphq_server::{create_app, init_metrics, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,dmphq_server=info,dmphq=info".into()),
        )
        .init();

    let config = Config::parse();
    init_metrics();

    let catalog = config
        .load_catalog()
        .context("failed to load module catalog")?;
    tracing::info!(
        modules = catalog.modules.len(),
        categories = catalog.all_categories().len(),
        "Module catalog ready"
    );

    let app = create_app(AppState::new(catalog));

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("dmphq listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
