use crate::domain::prediction::PipelineKind;
use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    #[serde(default)]
    pub server: ServerSettings,
    pub prediction_api: PredictionApiSettings,
    #[serde(default)]
    pub assets: AssetSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PredictionApiSettings {
    pub base_url: String,
    #[serde(default = "default_attrition_endpoint")]
    pub attrition_endpoint: String,
    #[serde(default = "default_shrinkage_endpoint")]
    pub shrinkage_endpoint: String,
    #[serde(default = "default_predictions_key")]
    pub predictions_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl PredictionApiSettings {
    pub fn endpoint(&self, kind: PipelineKind) -> &str {
        match kind {
            PipelineKind::Attrition => &self.attrition_endpoint,
            PipelineKind::Shrinkage => &self.shrinkage_endpoint,
        }
    }

    pub fn endpoint_url(&self, kind: PipelineKind) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.endpoint(kind).trim_start_matches('/')
        )
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssetSettings {
    #[serde(default = "default_asset_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_attrition_file")]
    pub attrition_file: String,
    #[serde(default = "default_shrinkage_file")]
    pub shrinkage_file: String,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            directory: default_asset_directory(),
            attrition_file: default_attrition_file(),
            shrinkage_file: default_shrinkage_file(),
        }
    }
}

impl AssetSettings {
    pub fn file_name(&self, kind: PipelineKind) -> &str {
        match kind {
            PipelineKind::Attrition => &self.attrition_file,
            PipelineKind::Shrinkage => &self.shrinkage_file,
        }
    }

    pub fn path(&self, kind: PipelineKind) -> PathBuf {
        self.directory.join(self.file_name(kind))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    #[serde(default = "default_available_years")]
    pub available_years: Vec<String>,
    #[serde(default = "default_brand")]
    pub brand: String,
    #[serde(default = "default_profile_name")]
    pub profile_name: String,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            available_years: default_available_years(),
            brand: default_brand(),
            profile_name: default_profile_name(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_attrition_endpoint() -> String {
    "get_attrition_data".to_string()
}

fn default_shrinkage_endpoint() -> String {
    "get_shrinkage_data".to_string()
}

fn default_predictions_key() -> String {
    "2024_predictions".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_asset_directory() -> PathBuf {
    PathBuf::from("assets")
}

fn default_attrition_file() -> String {
    "attrition_data.xlsx".to_string()
}

fn default_shrinkage_file() -> String {
    "shrinkage_data.xlsx".to_string()
}

fn default_available_years() -> Vec<String> {
    (2015..=2024).map(|y| y.to_string()).collect()
}

fn default_brand() -> String {
    "datanitiv".to_string()
}

fn default_profile_name() -> String {
    "Mohit Shah".to_string()
}

/// Load `config/dashboard.toml` (or the file named by `DASHBOARD_CONFIG`),
/// overridden by `DASHBOARD__*` variables.
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    match std::env::var_os("DASHBOARD_CONFIG") {
        Some(path) => load_dashboard_config_from(Path::new(&path)),
        None => build_config(config::File::with_name("config/dashboard")),
    }
}

pub fn load_dashboard_config_from(path: &Path) -> anyhow::Result<DashboardConfig> {
    build_config(config::File::from(path))
        .with_context(|| format!("Failed to load {}", path.display()))
}

fn build_config<S>(file: S) -> anyhow::Result<DashboardConfig>
where
    S: config::Source + Send + Sync + 'static,
{
    let settings = config::Config::builder()
        .add_source(file)
        .add_source(config::Environment::with_prefix("DASHBOARD").separator("__"))
        .build()
        .context("Failed to read dashboard configuration")?;

    let config: DashboardConfig = settings
        .try_deserialize()
        .context("Invalid dashboard configuration")?;
    config.validate()?;
    Ok(config)
}

impl DashboardConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        let base_url = &self.prediction_api.base_url;
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            anyhow::bail!("prediction_api.base_url must be an http(s) URL, got {:?}", base_url);
        }
        if self.prediction_api.timeout_secs == 0 {
            anyhow::bail!("prediction_api.timeout_secs must be greater than zero");
        }
        if self.dashboard.available_years.is_empty() {
            anyhow::bail!("dashboard.available_years must list at least one year");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_fill_missing_sections() {
        let file = write_config(
            r#"
            [prediction_api]
            base_url = "https://predictions.example.com/"
            "#,
        );

        let config = load_dashboard_config_from(file.path()).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.prediction_api.predictions_key, "2024_predictions");
        assert_eq!(
            config.prediction_api.endpoint_url(PipelineKind::Attrition),
            "https://predictions.example.com/get_attrition_data"
        );
        assert_eq!(
            config.assets.path(PipelineKind::Shrinkage),
            PathBuf::from("assets").join("shrinkage_data.xlsx")
        );
        assert_eq!(config.dashboard.available_years.first().map(String::as_str), Some("2015"));
        assert_eq!(config.dashboard.available_years.last().map(String::as_str), Some("2024"));
    }

    #[test]
    fn test_overrides() {
        let file = write_config(
            r#"
            [server]
            port = 9090

            [prediction_api]
            base_url = "http://localhost:5000"
            shrinkage_endpoint = "/v2/shrinkage"
            timeout_secs = 5

            [dashboard]
            available_years = ["2023", "2024"]
            "#,
        );

        let config = load_dashboard_config_from(file.path()).unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(
            config.prediction_api.endpoint_url(PipelineKind::Shrinkage),
            "http://localhost:5000/v2/shrinkage"
        );
        assert_eq!(config.dashboard.available_years, vec!["2023", "2024"]);
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let file = write_config(
            r#"
            [prediction_api]
            base_url = "ftp://predictions.example.com"
            "#,
        );

        let err = load_dashboard_config_from(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("base_url"));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let file = write_config(
            r#"
            [prediction_api]
            base_url = "https://predictions.example.com"
            timeout_secs = 0
            "#,
        );

        assert!(load_dashboard_config_from(file.path()).is_err());
    }
}
