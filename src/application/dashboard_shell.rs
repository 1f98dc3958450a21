// Dashboard shell - Owns filter and sidebar state and drives both chart pipelines
use crate::application::chart_pipeline::ChartPipeline;
use crate::domain::chart::PanelState;
use crate::domain::filter::FilterState;
use crate::domain::prediction::PipelineKind;
use crate::domain::sidebar::SidebarState;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock, watch};
use tokio::task::JoinHandle;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ShellError {
    #[error("year {0} is not one of the available years")]
    UnknownYear(String),
}

#[derive(Debug, Clone)]
struct PublishedPanel {
    generation: u64,
    state: PanelState,
}

#[derive(Debug)]
struct ShellState {
    filter: FilterState,
    generation: u64,
    year_selector_open: bool,
    sidebar: SidebarState,
    panels: HashMap<PipelineKind, PublishedPanel>,
}

/// Everything the dashboard page needs to render.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub filter: FilterState,
    pub sort_arrow: &'static str,
    pub available_years: Vec<String>,
    pub year_selector_open: bool,
    pub sidebar: SidebarState,
    pub generation: u64,
    pub attrition: PanelState,
    pub shrinkage: PanelState,
}

pub struct DashboardShell {
    pipeline: ChartPipeline,
    available_years: Vec<String>,
    state: RwLock<ShellState>,
    refresh_task: Mutex<Option<JoinHandle<()>>>,
    // Newest generation whose background refresh has finished or been dropped.
    completed: watch::Sender<u64>,
}

/// Marks a background refresh as done when it finishes or panics. An aborted
/// refresh is left unmarked since the task that replaced it marks a newer one.
struct RefreshDone {
    shell: Arc<DashboardShell>,
    generation: u64,
}

impl RefreshDone {
    fn mark(&self) {
        let generation = self.generation;
        self.shell.completed.send_if_modified(|done| {
            if generation > *done {
                *done = generation;
                true
            } else {
                false
            }
        });
    }
}

impl Drop for RefreshDone {
    fn drop(&mut self) {
        if std::thread::panicking() {
            tracing::error!("dashboard refresh for generation {} panicked", self.generation);
            self.mark();
        }
    }
}

impl DashboardShell {
    pub fn new(pipeline: ChartPipeline, available_years: Vec<String>) -> Self {
        let panels = PipelineKind::ALL
            .into_iter()
            .map(|kind| {
                (
                    kind,
                    PublishedPanel {
                        generation: 0,
                        state: PanelState::Loading,
                    },
                )
            })
            .collect();

        Self {
            pipeline,
            available_years,
            state: RwLock::new(ShellState {
                filter: FilterState::default(),
                generation: 0,
                year_selector_open: false,
                sidebar: SidebarState::default(),
                panels,
            }),
            refresh_task: Mutex::new(None),
            completed: watch::channel(0).0,
        }
    }

    pub fn available_years(&self) -> &[String] {
        &self.available_years
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        let state = self.state.read().await;
        let panel = |kind: PipelineKind| {
            state
                .panels
                .get(&kind)
                .map(|p| p.state.clone())
                .unwrap_or(PanelState::Loading)
        };

        DashboardSnapshot {
            filter: state.filter.clone(),
            sort_arrow: state.filter.order.arrow(),
            available_years: self.available_years.clone(),
            year_selector_open: state.year_selector_open,
            sidebar: state.sidebar,
            generation: state.generation,
            attrition: panel(PipelineKind::Attrition),
            shrinkage: panel(PipelineKind::Shrinkage),
        }
    }

    /// Kick off the first pipeline cycle.
    pub async fn start(self: &Arc<Self>) {
        {
            let mut state = self.state.write().await;
            Self::begin_generation(&mut state);
        }
        self.spawn_refresh().await;
    }

    /// Set or clear the year filter and close the selector.
    pub async fn select_year(
        self: &Arc<Self>,
        year: Option<String>,
    ) -> Result<DashboardSnapshot, ShellError> {
        let year = year.map(|y| y.trim().to_string()).filter(|y| !y.is_empty());
        if let Some(year) = &year {
            if !self.available_years.iter().any(|y| y == year) {
                return Err(ShellError::UnknownYear(year.clone()));
            }
        }

        {
            let mut state = self.state.write().await;
            state.filter.year_filter = year;
            state.year_selector_open = false;
            Self::begin_generation(&mut state);
            tracing::info!(
                "year filter set to {:?} (generation {})",
                state.filter.year_filter,
                state.generation
            );
        }
        self.spawn_refresh().await;
        Ok(self.snapshot().await)
    }

    pub async fn toggle_sort(self: &Arc<Self>) -> DashboardSnapshot {
        {
            let mut state = self.state.write().await;
            state.filter.order = state.filter.order.toggle();
            Self::begin_generation(&mut state);
            tracing::info!(
                "sort order set to {:?} (generation {})",
                state.filter.order,
                state.generation
            );
        }
        self.spawn_refresh().await;
        self.snapshot().await
    }

    pub async fn toggle_year_selector(&self) -> DashboardSnapshot {
        {
            let mut state = self.state.write().await;
            state.year_selector_open = !state.year_selector_open;
        }
        self.snapshot().await
    }

    pub async fn toggle_sidebar(&self) -> DashboardSnapshot {
        self.state.write().await.sidebar.toggle();
        self.snapshot().await
    }

    pub async fn collapse_sidebar(&self) -> DashboardSnapshot {
        self.state.write().await.sidebar.collapse();
        self.snapshot().await
    }

    /// Run both pipelines for the current filter and publish their results.
    ///
    /// Each panel publishes as soon as its own pipeline finishes. A result
    /// is dropped when a newer generation has already been started.
    pub async fn refresh(&self) {
        let (generation, filter) = {
            let state = self.state.read().await;
            (state.generation, state.filter.clone())
        };
        self.refresh_generation(generation, &filter).await;
    }

    async fn refresh_generation(&self, generation: u64, filter: &FilterState) {
        tokio::join!(
            self.run_and_publish(PipelineKind::Attrition, generation, filter),
            self.run_and_publish(PipelineKind::Shrinkage, generation, filter),
        );
    }

    /// Wait until the background refresh of the current generation is done.
    ///
    /// Any number of callers may wait at once. A mutation that lands while
    /// waiting moves the target to the newer generation.
    pub async fn settle(&self) {
        let mut done = self.completed.subscribe();
        loop {
            let target = self.state.read().await.generation;
            if done.wait_for(|completed| *completed >= target).await.is_err() {
                return;
            }
            if self.state.read().await.generation == target {
                return;
            }
        }
    }

    async fn run_and_publish(&self, kind: PipelineKind, generation: u64, filter: &FilterState) {
        let panel = self.pipeline.run(kind, filter).await;
        if self.publish(kind, generation, panel).await {
            tracing::debug!("published {} panel for generation {}", kind, generation);
        }
    }

    async fn publish(&self, kind: PipelineKind, generation: u64, panel: PanelState) -> bool {
        let mut state = self.state.write().await;
        if generation < state.generation {
            tracing::debug!(
                "dropping stale {} result from generation {} (current {})",
                kind,
                generation,
                state.generation
            );
            return false;
        }

        let slot = state.panels.entry(kind).or_insert(PublishedPanel {
            generation,
            state: PanelState::Loading,
        });
        if generation < slot.generation {
            return false;
        }
        slot.generation = generation;
        slot.state = panel;
        true
    }

    async fn spawn_refresh(self: &Arc<Self>) {
        let mut task = self.refresh_task.lock().await;
        if let Some(previous) = task.take() {
            previous.abort();
        }

        let (generation, filter) = {
            let state = self.state.read().await;
            (state.generation, state.filter.clone())
        };
        let done = RefreshDone {
            shell: Arc::clone(self),
            generation,
        };
        *task = Some(tokio::spawn(async move {
            done.shell.refresh_generation(generation, &filter).await;
            done.mark();
        }));
    }

    fn begin_generation(state: &mut ShellState) {
        state.generation += 1;
        let generation = state.generation;
        for panel in state.panels.values_mut() {
            panel.generation = generation;
            panel.state = PanelState::Loading;
        }
    }
}
