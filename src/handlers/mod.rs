//! HTTP endpoint handlers for the exporter.
//!
//! This module provides handlers for all HTTP endpoints:
//! - the telemetry path (default `/metrics`): Prometheus metrics endpoint
//! - `/`: landing page linking to the telemetry path
//! - `/health`: liveness endpoint

pub mod health;
pub mod home;
pub mod metrics;

// Re-export handlers
pub use health::health_handler;
pub use home::home_handler;
pub use metrics::metrics_handler;
