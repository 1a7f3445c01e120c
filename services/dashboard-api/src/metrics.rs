//! Request and event counters.
//!
//! Every event is counted twice: in a local atomic, so `/metrics` has
//! something to report when no Prometheus recorder is installed, and through
//! the `metrics` facade for the Prometheus exporter.

use std::sync::atomic::{AtomicU64, Ordering};

use metrics::counter;
use serde::Serialize;

#[derive(Debug, Default)]
pub struct DashboardMetrics {
    requests: AtomicU64,
    uploads: AtomicU64,
    upload_failures: AtomicU64,
    cell_clicks: AtomicU64,
}

impl DashboardMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an API request to `endpoint`.
    pub fn record_request(&self, endpoint: &'static str) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        counter!("dashboard_requests_total", "endpoint" => endpoint).increment(1);
    }

    /// Record an accepted upload
    pub fn record_upload(&self, bytes: u64) {
        self.uploads.fetch_add(1, Ordering::Relaxed);
        counter!("dashboard_uploads_total").increment(1);
        counter!("dashboard_upload_bytes_total").increment(bytes);
    }

    /// Record a rejected upload
    pub fn record_upload_failure(&self, kind: &'static str) {
        self.upload_failures.fetch_add(1, Ordering::Relaxed);
        counter!("dashboard_upload_failures_total", "kind" => kind).increment(1);
    }

    pub fn record_cell_click(&self) {
        self.cell_clicks.fetch_add(1, Ordering::Relaxed);
        counter!("dashboard_cell_clicks_total").increment(1);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            uploads: self.uploads.load(Ordering::Relaxed),
            upload_failures: self.upload_failures.load(Ordering::Relaxed),
            cell_clicks: self.cell_clicks.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub uploads: u64,
    pub upload_failures: u64,
    pub cell_clicks: u64,
}

impl MetricsSnapshot {
    /// Prometheus text exposition of the counters.
    pub fn to_prometheus_text(&self) -> String {
        let mut output = String::new();
        for (name, help, value) in [
            ("dashboard_requests_total", "Total API requests", self.requests),
            ("dashboard_uploads_total", "Accepted dataset uploads", self.uploads),
            (
                "dashboard_upload_failures_total",
                "Rejected dataset uploads",
                self.upload_failures,
            ),
            ("dashboard_cell_clicks_total", "Grid cell click events", self.cell_clicks),
        ] {
            output.push_str(&format!(
                "# HELP {name} {help}\n# TYPE {name} counter\n{name} {value}\n"
            ));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_without_recorder() {
        let metrics = DashboardMetrics::new();
        metrics.record_request("table");
        metrics.record_upload(1024);
        metrics.record_upload_failure("UploadError");
        metrics.record_cell_click();
        metrics.record_cell_click();

        let snap = metrics.snapshot();
        assert_eq!(snap.requests, 1);
        assert_eq!(snap.uploads, 1);
        assert_eq!(snap.upload_failures, 1);
        assert_eq!(snap.cell_clicks, 2);

        let text = snap.to_prometheus_text();
        assert!(text.contains("dashboard_cell_clicks_total 2\n"));
        assert!(text.contains("# TYPE dashboard_uploads_total counter"));
    }
}
