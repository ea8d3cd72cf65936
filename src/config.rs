use crate::model::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

pub const DEFAULT_CSV_URL: &str = "https://covid.ourworldindata.org/data/owid-covid-data.csv";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub csv_url: String,
    pub db_path: String,
    pub batch_size: usize,
    pub report_path: String,
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            csv_url: DEFAULT_CSV_URL.to_string(),
            db_path: "covid_db.sqlite".to_string(),
            batch_size: 5000,
            report_path: "output.txt".to_string(),
            user_agent: concat!("covid-digest/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Reads `path` if it exists, otherwise falls back to the defaults.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        info!("No config at {}, using defaults", path.display());
        return Ok(AppConfig::default());
    }
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    if config.batch_size == 0 {
        return Err(ConfigError::Invalid("batch_size must be greater than zero".into()));
    }
    Ok(config)
}
