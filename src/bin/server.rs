use anyhow::Context;
use std::sync::Arc;
use tracing::info;

use wordcab_slack::SummaryBot;
use wordcab_slack::api::{AppState, router};
use wordcab_slack::core::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    wordcab_slack::setup_logging();

    let config = AppConfig::from_env().context("Failed to load configuration from environment")?;
    let bot = Arc::new(SummaryBot::new(&config));
    let app = router(AppState::new(&config.slack_signing_secret, bot));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "Wordcab Slack bot listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
