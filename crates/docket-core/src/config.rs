use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SUPPORTED_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    pub version: u32,
    /// Court roster page (HTML).
    pub courts_url: String,
    /// First page of the case-law API; later pages come from its cursor.
    pub cases_url: String,
    /// Sampling bound on cursor pages, not a hard corpus size.
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
    #[serde(default)]
    pub auth_scheme: AuthScheme,
    /// Environment variable holding the case API key. The key itself never
    /// lives in the config file.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    pub states_csv: PathBuf,
}

fn default_page_limit() -> u32 {
    10
}

fn default_api_key_env() -> String {
    "CAP_API_KEY".to_string()
}

/// Authorization header format for the case API. Source history shows both
/// `Token <key>` and `Bearer <key>` in the wild, so the format is
/// configuration rather than a constant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    #[default]
    Token,
    Bearer,
    None,
}

pub fn load_config(path: &Path) -> Result<IngestConfig, ConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError(format!("failed to read config {}: {}", path.display(), e)))?;
    let cfg: IngestConfig = serde_yaml::from_str(&raw)
        .map_err(|e| ConfigError(format!("failed to parse YAML: {}", e)))?;
    if cfg.version != SUPPORTED_CONFIG_VERSION {
        return Err(ConfigError(format!(
            "unsupported config version {} (supported: {})",
            cfg.version, SUPPORTED_CONFIG_VERSION
        )));
    }
    if cfg.page_limit == 0 {
        return Err(ConfigError("page_limit must be at least 1".into()));
    }
    if cfg.courts_url.is_empty() || cfg.cases_url.is_empty() {
        return Err(ConfigError("courts_url and cases_url must be set".into()));
    }
    Ok(cfg)
}

pub fn write_sample_config(path: &Path) -> Result<(), ConfigError> {
    std::fs::write(path, include_str!("../../../docket.yaml"))
        .map_err(|e| ConfigError(format!("failed to write sample config: {}", e)))?;
    Ok(())
}
