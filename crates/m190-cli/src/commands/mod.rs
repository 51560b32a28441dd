//! Subcommands of the m190 CLI.

pub mod batch;
pub mod config;
pub mod process;
