//! Prometheus metrics for monitoring storefront traffic.
//!
//! Without an installed recorder every function here is a no-op, so handlers
//! record unconditionally.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use storefront_server::metrics;
//! use std::net::SocketAddr;
//!
//! let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
//! metrics::init_metrics(addr).unwrap();
//!
//! metrics::http_requests_total("POST", "/login", 302);
//! metrics::login_attempts_total(true);
//! ```

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record HTTP request.
pub fn http_requests_total(method: &str, path: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record HTTP request duration in milliseconds.
pub fn http_request_duration_ms(method: &str, path: &str, duration_ms: f64) {
    metrics::histogram!("http_request_duration_ms",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_ms);
}

// ============================================================================
// Account Metrics
// ============================================================================

/// Increment sign-up attempts counter, labelled by outcome
/// (`created`, `invalid`, `duplicate`, `error`).
pub fn signup_attempts_total(outcome: &'static str) {
    metrics::counter!("signup_attempts_total", "outcome" => outcome).increment(1);
}

/// Increment login attempts counter.
pub fn login_attempts_total(success: bool) {
    metrics::counter!("login_attempts_total",
        "success" => success.to_string()
    )
    .increment(1);
}

// ============================================================================
// Catalog Metrics
// ============================================================================

/// Increment catalog queries counter (`list` or `search`).
pub fn catalog_queries_total(kind: &'static str) {
    metrics::counter!("catalog_queries_total", "kind" => kind).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        http_requests_total("GET", "/products", 200);
        http_request_duration_ms("GET", "/products", 1.5);
        signup_attempts_total("created");
        login_attempts_total(false);
        catalog_queries_total("search");
    }
}
