//! Client for the Wordcab summarization API

pub mod client;
pub mod types;

pub use client::{SummaryApi, WordcabClient};
