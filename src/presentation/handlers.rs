// HTTP request handlers
use crate::application::dashboard_shell::DashboardSnapshot;
use crate::domain::chart::PanelState;
use crate::domain::filter::{FilterState, SortOrder};
use crate::domain::prediction::PipelineKind;
use crate::presentation::api_error::ApiError;
use crate::presentation::app_state::AppState;
use crate::presentation::page::{render_home, render_placeholder};
use axum::{
    Json,
    extract::{Path, Query, State},
    response::Html,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub wait: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChartQuery {
    pub year: Option<String>,
    pub ascending: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct YearSelection {
    pub year: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Dashboard home page
pub async fn home_page(State(state): State<Arc<AppState>>) -> Html<String> {
    state.shell.settle().await;
    let snapshot = state.shell.snapshot().await;
    Html(render_home(&snapshot, &state.dashboard))
}

pub async fn discover_page() -> Html<String> {
    Html(render_placeholder("Discover Page"))
}

pub async fn library_page() -> Html<String> {
    Html(render_placeholder("Library Page"))
}

pub async fn sign_in_page() -> Html<String> {
    Html(render_placeholder("Sign In Page"))
}

pub async fn sign_up_page() -> Html<String> {
    Html(render_placeholder("Sign Up Page"))
}

/// Current dashboard state; `?wait=true` waits for the pending refresh first
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> Json<DashboardSnapshot> {
    if query.wait.unwrap_or(false) {
        state.shell.settle().await;
    }
    Json(state.shell.snapshot().await)
}

pub async fn list_years(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.shell.available_years().to_vec())
}

pub async fn select_year(
    State(state): State<Arc<AppState>>,
    Json(selection): Json<YearSelection>,
) -> Result<Json<DashboardSnapshot>, ApiError> {
    let snapshot = state.shell.select_year(selection.year).await?;
    Ok(Json(snapshot))
}

pub async fn toggle_sort(State(state): State<Arc<AppState>>) -> Json<DashboardSnapshot> {
    Json(state.shell.toggle_sort().await)
}

pub async fn toggle_year_selector(State(state): State<Arc<AppState>>) -> Json<DashboardSnapshot> {
    Json(state.shell.toggle_year_selector().await)
}

pub async fn toggle_sidebar(State(state): State<Arc<AppState>>) -> Json<DashboardSnapshot> {
    Json(state.shell.toggle_sidebar().await)
}

pub async fn collapse_sidebar(State(state): State<Arc<AppState>>) -> Json<DashboardSnapshot> {
    Json(state.shell.collapse_sidebar().await)
}

/// Run one pipeline for an explicit filter without touching dashboard state
pub async fn chart(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<PanelState>, ApiError> {
    let kind = PipelineKind::parse(&kind)
        .ok_or_else(|| ApiError::NotFound(format!("unknown chart {:?}", kind)))?;
    let filter = FilterState::new(
        query.year,
        SortOrder::from_ascending(query.ascending.unwrap_or(true)),
    );

    Ok(Json(state.pipeline.run(kind, &filter).await))
}
