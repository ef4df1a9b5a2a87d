//! Small helpers shared across modules

pub mod files;
pub mod filters;
pub mod mime;
