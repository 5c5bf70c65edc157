//! Liveness endpoint handler.
//!
//! Reports that the exporter process itself is serving. It deliberately does
//! not scrape Kibana: upstream health is what the metrics themselves convey,
//! and a liveness probe must stay cheap.

use axum::response::IntoResponse;
use tracing::debug;

/// Handler for the /health endpoint.
pub async fn health_handler() -> impl IntoResponse {
    debug!("Processing /health request");

    (
        [("Content-Type", "text/plain; charset=utf-8")],
        format!("OK\nkibana-status-exporter {}\n", env!("CARGO_PKG_VERSION")),
    )
}
