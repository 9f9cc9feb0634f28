use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

pub const CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub ingestion: IngestionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// 0 lets tokio pick the worker-thread count.
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:randuser.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    /// `"*"` anywhere in the list allows any origin, mirroring the
    /// front-end-friendly allow-all policy.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5073,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    pub source_url: String,

    /// Records requested per batch when the command line gives no count.
    pub batch_size: u32,

    pub request_timeout_secs: u64,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            source_url: "https://randomuser.me/api".to_string(),
            batch_size: 500,
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        if !Path::new(CONFIG_PATH).exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(CONFIG_PATH)
            .with_context(|| format!("Failed to read {CONFIG_PATH}"))?;
        let config: Self =
            toml::from_str(&raw).with_context(|| format!("Failed to parse {CONFIG_PATH}"))?;

        Ok(config)
    }

    pub fn create_default_if_missing() -> Result<()> {
        if Path::new(CONFIG_PATH).exists() {
            return Ok(());
        }

        let rendered = toml::to_string_pretty(&Self::default())?;
        std::fs::write(CONFIG_PATH, rendered)?;
        info!("Created default config at {CONFIG_PATH}");

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.database_path.trim().is_empty() {
            bail!("general.database_path must not be empty");
        }
        if self.ingestion.source_url.trim().is_empty() {
            bail!("ingestion.source_url must not be empty");
        }
        if self.ingestion.batch_size == 0 {
            bail!("ingestion.batch_size must be positive");
        }

        Ok(())
    }
}
