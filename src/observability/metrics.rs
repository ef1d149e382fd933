//! Dispatch metrics and their Prometheus exposition.
//!
//! # Metrics
//! - `router_dispatch_total` (counter): dispatches by route and outcome
//! - `router_dispatch_duration_seconds` (histogram): match + handler time by route
//! - `router_registry_routes` (gauge): routes in the current table
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed, so library users pay nothing
//! - Unmatched requests are labelled `route="none"` to keep label cardinality bounded

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one dispatch.
pub fn record_dispatch(route: &str, outcome: &str, start: Instant) {
    metrics::counter!(
        "router_dispatch_total",
        "route" => route.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
    metrics::histogram!("router_dispatch_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record the size of the route table after a mutation.
pub fn record_registry_size(routes: usize) {
    metrics::gauge!("router_registry_routes").set(routes as f64);
}
