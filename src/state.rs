//! Application state management for the exporter.
//!
//! This module defines the shared application state that is passed to the
//! HTTP handlers.

use prometheus::Registry;
use std::sync::Arc;

use crate::config::Config;

/// Type alias for shared application state.
pub type SharedState = Arc<AppState>;

/// Global application state shared across requests.
pub struct AppState {
    pub registry: Registry,
    pub config: Arc<Config>,
}
