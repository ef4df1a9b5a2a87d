//! All Slack-specific functionality

pub mod client;
pub mod response_builder;

// Re-export main types for convenience
pub use client::{ChatApi, SlackClient};
pub use response_builder::SummaryFile;
