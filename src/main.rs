// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::chart_pipeline::ChartPipeline;
use crate::application::dashboard_shell::DashboardShell;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::prediction_client::HttpPredictionClient;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = load_dashboard_config()?;

    // Initialize tracing, RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.server.log_level))
        .context("Invalid log level")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Create prediction client (infrastructure layer)
    let client = Arc::new(HttpPredictionClient::new(
        config.prediction_api.clone(),
        config.assets.clone(),
    )?);

    // Create pipeline and dashboard shell (application layer)
    let pipeline = ChartPipeline::new(client);
    let shell = Arc::new(DashboardShell::new(
        pipeline.clone(),
        config.dashboard.available_years.clone(),
    ));
    shell.start().await;

    let state = Arc::new(AppState {
        shell,
        pipeline,
        dashboard: config.dashboard.clone(),
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/", get(handlers::home_page))
        .route("/discover", get(handlers::discover_page))
        .route("/library", get(handlers::library_page))
        .route("/signin", get(handlers::sign_in_page))
        .route("/signup", get(handlers::sign_up_page))
        .route("/healthz", get(handlers::health_check))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/years", get(handlers::list_years))
        .route("/api/filter/year", post(handlers::select_year))
        .route("/api/filter/sort", post(handlers::toggle_sort))
        .route("/api/filter/selector", post(handlers::toggle_year_selector))
        .route("/api/sidebar/toggle", post(handlers::toggle_sidebar))
        .route("/api/sidebar/collapse", post(handlers::collapse_sidebar))
        .route("/api/charts/:kind", get(handlers::chart))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!("Starting hr-prediction-dashboard on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, router).await?;

    Ok(())
}
