//! Prometheus collector adapter for Kibana status metrics.
//!
//! The [`Exporter`] implements [`prometheus::core::Collector`]: `desc`
//! returns the static descriptors of the twelve exported gauges, and
//! `collect` runs one full scrape cycle (scrape, map, emit) under an
//! exclusive lock. A failed cycle emits nothing and leaves the previously
//! set gauge values untouched.

use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{Gauge, Opts};
use std::sync::{Arc, Mutex};
use tracing::{debug, error};

use crate::kibana::KibanaClient;
use crate::snapshot::StatusSnapshot;

/// Namespace prefix for all exported metrics.
pub const NAMESPACE: &str = "kibana";

/// The fixed set of gauges exported per scrape, together with the scrape
/// client and the lock that serializes collection cycles.
#[derive(Clone)]
pub struct Exporter {
    client: KibanaClient,
    // Serializes the whole scrape-map-emit sequence; clones share the lock.
    cycle: Arc<Mutex<()>>,

    pub status: Gauge,
    pub concurrent_connections: Gauge,
    pub uptime: Gauge,
    pub heap_total: Gauge,
    pub heap_used: Gauge,
    pub load_1m: Gauge,
    pub load_5m: Gauge,
    pub load_15m: Gauge,
    pub response_time_avg: Gauge,
    pub response_time_max: Gauge,
    pub request_disconnects: Gauge,
    pub request_total: Gauge,
}

fn gauge(name: &str, help: &str) -> Result<Gauge, prometheus::Error> {
    Gauge::with_opts(Opts::new(name, help).namespace(NAMESPACE))
}

impl Exporter {
    /// Creates the exporter with its twelve gauge instruments. The gauges
    /// are owned here and handed to the registry only through the
    /// `Collector` impl.
    pub fn new(client: KibanaClient) -> Result<Self, prometheus::Error> {
        Ok(Self {
            client,
            cycle: Arc::new(Mutex::new(())),
            status: gauge("status", "Kibana overall status")?,
            concurrent_connections: gauge(
                "concurrent_connections",
                "Kibana concurrent connections",
            )?,
            uptime: gauge("millis_uptime", "Kibana uptime in milliseconds")?,
            heap_total: gauge("heap_max_in_bytes", "Kibana heap maximum in bytes")?,
            heap_used: gauge("heap_used_in_bytes", "Kibana heap usage in bytes")?,
            load_1m: gauge("os_load_1m", "Kibana load average 1m")?,
            load_5m: gauge("os_load_5m", "Kibana load average 5m")?,
            load_15m: gauge("os_load_15m", "Kibana load average 15m")?,
            response_time_avg: gauge(
                "response_average",
                "Kibana average response time in milliseconds",
            )?,
            response_time_max: gauge(
                "response_max",
                "Kibana maximum response time in milliseconds",
            )?,
            request_disconnects: gauge(
                "requests_disconnects",
                "Kibana request disconnections count",
            )?,
            request_total: gauge("requests_total", "Kibana total request count")?,
        })
    }

    /// Maps a decoded snapshot onto the gauge set.
    ///
    /// The overall state is reduced to a binary health signal: exactly 1.0
    /// when the state equals "green" (case-insensitive), 0.0 for anything
    /// else. All numeric fields are widened to f64 without conversion.
    pub fn apply(&self, snapshot: &StatusSnapshot) {
        let healthy = snapshot.status.overall.state.eq_ignore_ascii_case("green");
        self.status.set(if healthy { 1.0 } else { 0.0 });

        let m = &snapshot.metrics;
        self.concurrent_connections
            .set(m.concurrent_connections as f64);
        self.uptime.set(m.process.uptime_in_millis as f64);
        self.heap_total.set(m.process.memory.heap.total_in_bytes as f64);
        self.heap_used.set(m.process.memory.heap.used_in_bytes as f64);
        self.load_1m.set(m.os.load.one_min);
        self.load_5m.set(m.os.load.five_min);
        self.load_15m.set(m.os.load.fifteen_min);
        self.response_time_avg.set(m.response_times.avg_in_millis);
        self.response_time_max.set(m.response_times.max_in_millis);
        self.request_disconnects.set(m.requests.disconnects as f64);
        self.request_total.set(m.requests.total as f64);
    }

    /// Current metric families of all twelve gauges, in the fixed emission
    /// order. The order carries no meaning for the registry but keeps test
    /// output deterministic.
    pub fn families(&self) -> Vec<MetricFamily> {
        let mut families = Vec::with_capacity(12);
        families.extend(self.status.collect());
        families.extend(self.concurrent_connections.collect());
        families.extend(self.uptime.collect());
        families.extend(self.heap_total.collect());
        families.extend(self.heap_used.collect());
        families.extend(self.load_1m.collect());
        families.extend(self.load_5m.collect());
        families.extend(self.load_15m.collect());
        families.extend(self.response_time_avg.collect());
        families.extend(self.response_time_max.collect());
        families.extend(self.request_disconnects.collect());
        families.extend(self.request_total.collect());
        families
    }
}

impl Collector for Exporter {
    fn desc(&self) -> Vec<&Desc> {
        let mut descs = Vec::with_capacity(12);
        descs.extend(self.status.desc());
        descs.extend(self.concurrent_connections.desc());
        descs.extend(self.uptime.desc());
        descs.extend(self.heap_total.desc());
        descs.extend(self.heap_used.desc());
        descs.extend(self.load_1m.desc());
        descs.extend(self.load_5m.desc());
        descs.extend(self.load_15m.desc());
        descs.extend(self.response_time_avg.desc());
        descs.extend(self.response_time_max.desc());
        descs.extend(self.request_disconnects.desc());
        descs.extend(self.request_total.desc());
        descs
    }

    fn collect(&self) -> Vec<MetricFamily> {
        // One scrape cycle in flight at a time; concurrent collection
        // requests block here and then run their own full cycle.
        let _cycle = match self.cycle.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let snapshot = match self.client.scrape() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                error!("error while scraping metrics from Kibana: {}", err);
                return Vec::new();
            }
        };

        self.apply(&snapshot);
        debug!("scrape cycle completed");
        self.families()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn test_exporter() -> Exporter {
        let config = Config {
            kibana_url: Some("http://127.0.0.1:1".to_string()),
            ..Config::default()
        };
        Exporter::new(KibanaClient::new(&config).unwrap()).unwrap()
    }

    fn sample_snapshot() -> StatusSnapshot {
        serde_json::from_str(
            r#"{
                "status": {"overall": {"state": "green"}},
                "metrics": {
                    "concurrent_connections": 5,
                    "process": {
                        "uptime_in_millis": 1000,
                        "memory": {"heap": {"total_in_bytes": 2000, "used_in_bytes": 1000}}
                    },
                    "os": {"load": {"1m": 1.0, "5m": 2.0, "15m": 3.0}},
                    "response_times": {"avg_in_millis": 1.5, "max_in_millis": 9.9},
                    "requests": {"disconnects": 2, "total": 50}
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn sample_snapshot_maps_to_expected_values() {
        let exporter = test_exporter();
        exporter.apply(&sample_snapshot());

        assert_eq!(exporter.status.get(), 1.0);
        assert_eq!(exporter.concurrent_connections.get(), 5.0);
        assert_eq!(exporter.uptime.get(), 1000.0);
        assert_eq!(exporter.heap_total.get(), 2000.0);
        assert_eq!(exporter.heap_used.get(), 1000.0);
        assert_eq!(exporter.load_1m.get(), 1.0);
        assert_eq!(exporter.load_5m.get(), 2.0);
        assert_eq!(exporter.load_15m.get(), 3.0);
        assert_eq!(exporter.response_time_avg.get(), 1.5);
        assert_eq!(exporter.response_time_max.get(), 9.9);
        assert_eq!(exporter.request_disconnects.get(), 2.0);
        assert_eq!(exporter.request_total.get(), 50.0);
    }

    #[test]
    fn mapping_is_deterministic() {
        let exporter = test_exporter();
        exporter.apply(&sample_snapshot());
        let first: Vec<f64> = exporter
            .families()
            .iter()
            .map(|f| f.get_metric()[0].get_gauge().value())
            .collect();

        exporter.apply(&sample_snapshot());
        let second: Vec<f64> = exporter
            .families()
            .iter()
            .map(|f| f.get_metric()[0].get_gauge().value())
            .collect();

        assert_eq!(first, second);
    }

    #[test]
    fn overall_state_maps_case_insensitively_to_binary_health() {
        let exporter = test_exporter();

        for (state, expected) in [
            ("green", 1.0),
            ("Green", 1.0),
            ("GREEN", 1.0),
            ("yellow", 0.0),
            ("red", 0.0),
            ("greenish", 0.0),
            ("", 0.0),
        ] {
            let mut snapshot = StatusSnapshot::default();
            snapshot.status.overall.state = state.to_string();
            exporter.apply(&snapshot);
            assert_eq!(
                exporter.status.get(),
                expected,
                "state {:?} mapped incorrectly",
                state
            );
        }
    }

    #[test]
    fn emission_order_is_fixed() {
        let exporter = test_exporter();
        let names: Vec<String> = exporter
            .families()
            .iter()
            .map(|f| f.get_name().to_string())
            .collect();

        assert_eq!(
            names,
            vec![
                "kibana_status",
                "kibana_concurrent_connections",
                "kibana_millis_uptime",
                "kibana_heap_max_in_bytes",
                "kibana_heap_used_in_bytes",
                "kibana_os_load_1m",
                "kibana_os_load_5m",
                "kibana_os_load_15m",
                "kibana_response_average",
                "kibana_response_max",
                "kibana_requests_disconnects",
                "kibana_requests_total",
            ]
        );
    }

    #[test]
    fn descriptors_are_static_and_complete() {
        let exporter = test_exporter();
        let descs = exporter.desc();
        assert_eq!(descs.len(), 12);

        // Descriptors do not depend on scrape outcome.
        let before: Vec<String> = descs.iter().map(|d| d.fq_name.clone()).collect();
        let _ = exporter.collect();
        let after: Vec<String> = exporter.desc().iter().map(|d| d.fq_name.clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn failed_scrape_emits_nothing_and_keeps_prior_values() {
        let exporter = test_exporter();
        exporter.apply(&sample_snapshot());

        // The client points at an unreachable address, so this cycle fails.
        let families = exporter.collect();
        assert!(families.is_empty());

        // Previously set values remain visible on the instruments.
        assert_eq!(exporter.status.get(), 1.0);
        assert_eq!(exporter.request_total.get(), 50.0);
    }
}
