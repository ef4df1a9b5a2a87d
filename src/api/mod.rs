//! HTTP surface: the Slack Events API endpoint and a health check

pub mod event_handler;
pub mod handler;
pub mod helpers;
pub mod parsing;
pub mod signature;

// Re-export the router for convenience
pub use handler::{AppState, router};
