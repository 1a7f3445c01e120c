//! Application state for the dashboard API.

use dashboard_core::SessionState;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::sync::RwLock;

use crate::config::DashboardConfig;
use crate::metrics::DashboardMetrics;

/// Shared application state.
pub struct AppState {
    /// The one dashboard session this process serves.
    pub session: RwLock<SessionState>,

    /// Validated service configuration.
    pub config: DashboardConfig,

    pub metrics: DashboardMetrics,

    /// Prometheus recorder handle; `None` when no recorder is installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// State with an empty session.
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            session: RwLock::new(SessionState::new()),
            config,
            metrics: DashboardMetrics::new(),
            prometheus: None,
        }
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }

    /// Run the startup CSV load and record the outcome in the session.
    ///
    /// The load touches the filesystem, so it runs on the blocking pool.
    pub async fn load_table(&self) {
        let loader = self.config.csv.clone();
        let result = match tokio::task::spawn_blocking(move || csv_loader::load(&loader)).await {
            Ok(result) => result,
            Err(e) => Err(climate_common::DashboardError::ParseError(format!(
                "loader task failed: {}",
                e
            ))),
        };
        self.session.write().await.on_table_loaded(result);
    }
}
