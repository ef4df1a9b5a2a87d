//! Wordcab Slack - a Slack bot that summarizes shared recordings and transcripts.
//!
//! Users post an audio or text file (or mention the bot with a `transcript_id`),
//! optionally with summarization options in the message text. The bot submits the
//! request to the Wordcab summarization API, mirrors job progress as reactions on the
//! message, and uploads the finished summaries as files in the message thread.
//!
//! # Architecture
//!
//! The system uses:
//! - axum for the Slack Events API endpoint
//! - slack-morphism for Slack API interactions
//! - reqwest for the summarization API
//! - an in-memory job registry shared by per-job polling tasks
//! - Tokio for async runtime
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use wordcab_slack::core::config::AppConfig;
//! use wordcab_slack::{SummaryBot, api};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Set up structured logging
//!     wordcab_slack::setup_logging();
//!
//!     let config = AppConfig::from_env()?;
//!     let bot = Arc::new(SummaryBot::new(&config));
//!     let app = api::router(api::AppState::new(&config.slack_signing_secret, bot));
//!
//!     let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod bot;
pub mod core;
pub mod errors;
pub mod slack;
pub mod utils;
pub mod wordcab;
pub mod worker;

pub use bot::SummaryBot;
pub use errors::BotError;

/// Configure structured JSON logging.
///
/// Installs a tracing-subscriber registry with a JSON formatter and an
/// `EnvFilter` read from `RUST_LOG` (default `info`). Calling it more than once
/// is harmless; later calls leave the first subscriber in place.
///
/// # Example
///
/// ```
/// // Initialize structured logging at startup
/// wordcab_slack::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
