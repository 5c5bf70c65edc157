//! CLI arguments and subcommands for kibana-status-exporter.
//!
//! This module defines the command-line interface structure using the clap
//! library, including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use std::net::IpAddr;
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "kibana-status-exporter",
    about = "Prometheus exporter for Kibana status and runtime metrics",
    long_about = "Prometheus exporter for Kibana status and runtime metrics.\n\n\
                  Scrapes the Kibana status API on each Prometheus collection \
                  request and republishes overall health, connection, heap, load, \
                  response-time and request counters as gauges.",
    version,
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// HTTP listen port
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// Bind to specific interface/IP
    #[arg(long)]
    pub bind: Option<IpAddr>,

    /// Path under which to expose metrics
    #[arg(long)]
    pub telemetry_path: Option<String>,

    /// Base URL of the Kibana instance to scrape
    #[arg(long)]
    pub kibana_url: Option<String>,

    /// Username for Kibana basic authentication
    #[arg(long)]
    pub kibana_username: Option<String>,

    /// Password for Kibana basic authentication
    #[arg(long)]
    pub kibana_password: Option<String>,

    /// Upstream request timeout in seconds
    #[arg(long)]
    pub scrape_timeout: Option<u64>,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate configuration files
    Config {
        /// Output file path
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,

        /// Include comments and examples
        #[arg(long)]
        commented: bool,
    },

    /// Perform a single scrape against the configured Kibana target
    Test {
        /// Show the raw decoded snapshot in addition to instrument values
        #[arg(long)]
        verbose: bool,
    },
}
