// Application state for HTTP handlers
use crate::application::chart_pipeline::ChartPipeline;
use crate::application::dashboard_shell::DashboardShell;
use crate::infrastructure::config::DashboardSettings;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub shell: Arc<DashboardShell>,
    pub pipeline: ChartPipeline,
    pub dashboard: DashboardSettings,
}
