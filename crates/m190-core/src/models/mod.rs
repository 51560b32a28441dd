//! Data models: recipient records and pipeline configuration.

pub mod config;
pub mod record;
