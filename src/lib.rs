//! Prometheus exporter for Kibana status and runtime metrics.
//!
//! The exporter scrapes `GET /api/status?extended` on a Kibana instance each
//! time Prometheus collects from it and republishes twelve scalar fields of
//! the status document as gauges under the `kibana` namespace.

pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod exporter;
pub mod handlers;
pub mod kibana;
pub mod snapshot;
pub mod state;

pub use config::Config;
pub use errors::ScrapeError;
pub use exporter::Exporter;
pub use kibana::KibanaClient;
pub use snapshot::StatusSnapshot;
