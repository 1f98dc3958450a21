// Application layer - Use cases wired over the prediction source
pub mod aggregator;
pub mod chart_pipeline;
pub mod dashboard_shell;
pub mod filter_sort;
pub mod prediction_source;
pub mod presenter;

#[cfg(test)]
pub mod fake_source;
