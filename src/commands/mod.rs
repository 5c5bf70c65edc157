//! CLI command implementations for kibana-status-exporter.
//!
//! This module provides implementations for all CLI subcommands:
//! - `config`: Configuration file generation
//! - `test`: One-shot scrape against the configured Kibana target

pub mod config;
pub mod test;

// Re-export command functions
pub use config::command_config;
pub use test::command_test;
