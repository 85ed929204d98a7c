//! Prometheus metrics setup and helpers.

use anyhow::Result;
use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and return a handle for the scrape
/// endpoint. Call once at startup.
pub fn init_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    Ok(handle)
}

/// Record a remote asset whose deletion could not be confirmed and that
/// may now be orphaned on the media host.
pub fn record_orphaned_asset(operation: &'static str) {
    counter!("media_orphaned_assets_total", "operation" => operation).increment(1);
}

/// Record a handled API request by route group and outcome class.
pub fn record_request(route: &'static str, status: u16) {
    let class = match status {
        200..=299 => "success",
        400..=499 => "client_error",
        _ => "server_error",
    };
    counter!("api_requests_total", "route" => route, "class" => class).increment(1);
}
