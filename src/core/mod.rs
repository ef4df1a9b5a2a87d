//! Domain core: configuration, request models, parameter parsing and job tracking.

pub mod config;
pub mod models;
pub mod params;
pub mod registry;
pub mod status;
