//! Landing page handler.

use axum::{extract::State, response::Html};
use tracing::debug;

use crate::state::SharedState;

/// Handler for the root page. Links to the configured telemetry path.
pub async fn home_handler(State(state): State<SharedState>) -> Html<String> {
    debug!("Processing root page request");

    let telemetry_path = state.config.effective_telemetry_path();
    Html(format!(
        "<html>\n\
         <head><title>Kibana Exporter</title></head>\n\
         <body>\n\
         <h1>Kibana Exporter</h1>\n\
         <p><a href='{}'>Metrics</a></p>\n\
         </body>\n\
         </html>",
        telemetry_path
    ))
}
