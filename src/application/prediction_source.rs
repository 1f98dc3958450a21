// Source trait for prediction data access
use crate::domain::prediction::{PipelineKind, PredictionPayload};
use async_trait::async_trait;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error("failed to load {}: {source}", .path.display())]
    ResourceLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{endpoint} failed{}: {message}", status_suffix(.status))]
    Upstream {
        endpoint: String,
        status: Option<u16>,
        message: String,
    },

    #[error("{endpoint} returned malformed JSON: {source}")]
    MalformedResponse {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{endpoint} returned an unexpected shape, expected {expected}")]
    UnexpectedShape {
        endpoint: String,
        expected: &'static str,
    },
}

impl PredictionError {
    /// Stable tag surfaced to clients alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            PredictionError::ResourceLoad { .. } => "resourceLoad",
            PredictionError::Upstream { .. } => "upstream",
            PredictionError::MalformedResponse { .. } => "malformedResponse",
            PredictionError::UnexpectedShape { .. } => "unexpectedShape",
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" with status {}", s)).unwrap_or_default()
}

#[async_trait]
pub trait PredictionSource: Send + Sync {
    /// Upload the spreadsheet for `kind` and decode the prediction response
    /// into the payload variant that pipeline expects.
    async fn fetch(&self, kind: PipelineKind) -> Result<PredictionPayload, PredictionError>;
}
