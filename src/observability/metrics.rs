//! Metrics collection and exposition.
//!
//! # Metrics
//! - `redirect_decisions_total` (counter): decisions by outcome and status
//! - `redirect_decision_duration_seconds` (histogram): time to decide
//! - `redirect_rules_loaded` (gauge): size of the live rule set

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::engine::decision::RedirectDecision;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one processing pass.
pub fn record_decision(decision: &RedirectDecision, started: Instant) {
    let status = decision
        .status()
        .map(|s| s.as_u16().to_string())
        .unwrap_or_else(|| "none".to_string());

    ::metrics::counter!(
        "redirect_decisions_total",
        "outcome" => decision.outcome(),
        "status" => status
    )
    .increment(1);

    ::metrics::histogram!(
        "redirect_decision_duration_seconds",
        "outcome" => decision.outcome()
    )
    .record(started.elapsed().as_secs_f64());
}

/// Record the size of the rule set currently being served.
pub fn record_rules_loaded(count: usize) {
    ::metrics::gauge!("redirect_rules_loaded").set(count as f64);
}
