//! Skinwatch Dashboard binary.
//!
//! Entry point for the terminal dashboard.

use anyhow::Context;
use skinwatch_dashboard::{DashboardApp, DashboardConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they stay out of the rendered dashboard
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,skinwatch_dashboard=debug,skinwatch_sdk=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = DashboardConfig::load().context("failed to load configuration")?;

    tracing::info!("Starting Skinwatch dashboard");
    tracing::info!("WebSocket URL: {}", config.websocket_url());
    tracing::info!("Liveness timeout: {}s", config.liveness_timeout_secs);
    tracing::info!("Auto-connect: {}", config.auto_connect);

    DashboardApp::new(config)?.run().await
}
