// HTTP prediction client - Uploads the spreadsheets and decodes the responses
use crate::application::prediction_source::{PredictionError, PredictionSource};
use crate::domain::prediction::{PipelineKind, PredictionPayload};
use crate::infrastructure::config::{AssetSettings, PredictionApiSettings};
use crate::infrastructure::response_decoder::{decode_attrition, decode_shrinkage};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Clone)]
pub struct HttpPredictionClient {
    client: reqwest::Client,
    api: PredictionApiSettings,
    assets: AssetSettings,
}

impl HttpPredictionClient {
    pub fn new(api: PredictionApiSettings, assets: AssetSettings) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .build()
            .context("Failed to build prediction API client")?;

        Ok(Self {
            client,
            api,
            assets,
        })
    }

    async fn load_asset(&self, kind: PipelineKind) -> Result<Vec<u8>, PredictionError> {
        let path = self.assets.path(kind);
        tokio::fs::read(&path)
            .await
            .map_err(|source| PredictionError::ResourceLoad { path, source })
    }

    async fn upload(&self, kind: PipelineKind, bytes: Vec<u8>) -> Result<String, PredictionError> {
        let endpoint = self.api.endpoint(kind);
        let upstream = |status: Option<u16>, message: String| PredictionError::Upstream {
            endpoint: endpoint.to_string(),
            status,
            message,
        };

        let part = Part::bytes(bytes)
            .file_name(self.assets.file_name(kind).to_string())
            .mime_str(XLSX_MIME)
            .map_err(|e| upstream(None, e.to_string()))?;
        let form = Form::new().part("file", part);

        let url = self.api.endpoint_url(kind);
        tracing::debug!("Uploading {} to {}", self.assets.file_name(kind), url);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| upstream(e.status().map(|s| s.as_u16()), e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(upstream(Some(status.as_u16()), excerpt(&body)));
        }

        response
            .text()
            .await
            .map_err(|e| upstream(None, format!("failed to read response body: {}", e)))
    }
}

#[async_trait]
impl PredictionSource for HttpPredictionClient {
    async fn fetch(&self, kind: PipelineKind) -> Result<PredictionPayload, PredictionError> {
        let bytes = self.load_asset(kind).await?;
        let body = self.upload(kind, bytes).await?;
        let endpoint = self.api.endpoint(kind);

        match kind {
            PipelineKind::Attrition => decode_attrition(endpoint, &body).map(PredictionPayload::Flat),
            PipelineKind::Shrinkage => decode_shrinkage(endpoint, &body, &self.api.predictions_key)
                .map(PredictionPayload::Segmented),
        }
    }
}

fn excerpt(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return "empty response body".to_string();
    }
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
