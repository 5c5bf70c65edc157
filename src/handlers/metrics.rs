//! Metrics endpoint handler for Prometheus scraping.
//!
//! Each request triggers one collection cycle through the registered
//! collector: the registry's `gather` call drives the scrape against Kibana.
//! The collector performs blocking network I/O, so gathering runs on the
//! blocking thread pool rather than on the async runtime.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use prometheus::{Encoder, TextEncoder};
use std::time::Instant;
use tracing::{debug, error};

use crate::state::SharedState;

/// Buffer capacity for metrics encoding.
const BUFFER_CAP: usize = 16 * 1024;

/// Error type for metrics endpoint failures.
#[derive(Debug)]
pub enum MetricsError {
    EncodingFailed,
    CollectionFailed,
}

impl IntoResponse for MetricsError {
    fn into_response(self) -> axum::response::Response {
        let message = match self {
            MetricsError::EncodingFailed => "Failed to encode metrics",
            MetricsError::CollectionFailed => "Failed to collect metrics",
        };
        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
    }
}

/// Handler for the telemetry path.
pub async fn metrics_handler(State(state): State<SharedState>) -> Result<String, MetricsError> {
    let start = Instant::now();
    debug!("Processing metrics request");

    let registry = state.registry.clone();
    let buffer = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, MetricsError> {
        let families = registry.gather();

        let mut buffer = Vec::with_capacity(BUFFER_CAP);
        let encoder = TextEncoder::new();
        if encoder.encode(&families, &mut buffer).is_err() {
            error!("Failed to encode Prometheus metrics");
            return Err(MetricsError::EncodingFailed);
        }
        Ok(buffer)
    })
    .await
    .map_err(|err| {
        error!("Metrics collection task failed: {}", err);
        MetricsError::CollectionFailed
    })??;

    debug!(
        "Metrics request completed: {} bytes, {:.3}ms",
        buffer.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    String::from_utf8(buffer).map_err(|_| MetricsError::EncodingFailed)
}
