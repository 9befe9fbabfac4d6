//! Metrics collection and exposition.
//!
//! # Metrics
//! - `failover_attempts_total` (counter): attempts by endpoint, category
//! - `failover_switches_total` (counter): current-endpoint changes by from, to
//! - `failover_sweeps_total` (counter): finished sweeps by result
//! - `failover_sweep_duration_seconds` (histogram): time spent sweeping backups
//! - `failover_probe_checks_total` (counter): recovery probes by healthy
//! - `failover_primary_restored_total` (counter): probe-driven restorations
//!
//! Recording is a no-op until a recorder is installed with [`init_metrics`].

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::outcome::StatusCategory;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_attempt(endpoint: &str, category: StatusCategory) {
    counter!(
        "failover_attempts_total",
        "endpoint" => endpoint.to_string(),
        "category" => category.as_str()
    )
    .increment(1);
}

pub fn record_switch(from: &str, to: &str) {
    counter!(
        "failover_switches_total",
        "from" => from.to_string(),
        "to" => to.to_string()
    )
    .increment(1);
}

pub fn record_sweep(result: StatusCategory, start_time: Instant) {
    counter!("failover_sweeps_total", "result" => result.as_str()).increment(1);
    histogram!("failover_sweep_duration_seconds").record(start_time.elapsed().as_secs_f64());
}

pub fn record_probe(healthy: bool) {
    counter!(
        "failover_probe_checks_total",
        "healthy" => if healthy { "true" } else { "false" }
    )
    .increment(1);
}

pub fn record_primary_restored() {
    counter!("failover_primary_restored_total").increment(1);
}
