//! Decoded representation of one Kibana status response.
//!
//! The structures below mirror the nested layout of the JSON body returned
//! by `GET /api/status?extended`. Every field is defaulted so that a status
//! document with missing sections still decodes; unknown fields are ignored.

use serde::Deserialize;

/// The decoded result of a single scrape. Constructed fresh per scrape and
/// discarded after its values have been mapped onto the exported gauges.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusSnapshot {
    #[serde(default)]
    pub status: StatusSection,
    #[serde(default)]
    pub metrics: MetricsSection,
}

/// Top-level `status` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusSection {
    #[serde(default)]
    pub overall: OverallStatus,
}

/// Overall health state as reported by Kibana ("green", "yellow", "red").
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverallStatus {
    #[serde(default)]
    pub state: String,
}

/// Top-level `metrics` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsSection {
    #[serde(default)]
    pub concurrent_connections: i64,
    #[serde(default)]
    pub process: ProcessMetrics,
    #[serde(default)]
    pub os: OsMetrics,
    #[serde(default)]
    pub response_times: ResponseTimes,
    #[serde(default)]
    pub requests: RequestMetrics,
}

/// Kibana process uptime and heap usage.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessMetrics {
    #[serde(default)]
    pub uptime_in_millis: i64,
    #[serde(default)]
    pub memory: ProcessMemory,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessMemory {
    #[serde(default)]
    pub heap: HeapMetrics,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HeapMetrics {
    #[serde(default)]
    pub total_in_bytes: i64,
    #[serde(default)]
    pub used_in_bytes: i64,
}

/// Host load averages as seen by the Kibana process.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OsMetrics {
    #[serde(default)]
    pub load: LoadAverage,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoadAverage {
    #[serde(rename = "1m", default)]
    pub one_min: f64,
    #[serde(rename = "5m", default)]
    pub five_min: f64,
    #[serde(rename = "15m", default)]
    pub fifteen_min: f64,
}

/// Response time statistics in milliseconds.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseTimes {
    #[serde(default)]
    pub avg_in_millis: f64,
    #[serde(default)]
    pub max_in_millis: f64,
}

/// Request counters since process start.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestMetrics {
    #[serde(default)]
    pub disconnects: i64,
    #[serde(default)]
    pub total: i64,
}
