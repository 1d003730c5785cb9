use std::sync::Arc;

use anyhow::Context;

use invoicedesk_api::app::{self, AppServices};
use invoicedesk_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    invoicedesk_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!(?config, "starting");

    let services = Arc::new(
        AppServices::from_config(&config)
            .await
            .context("failed to initialise services")?,
    );
    let app = app::build_app(services.clone());

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    services.shutdown().await;
    tracing::info!("stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
