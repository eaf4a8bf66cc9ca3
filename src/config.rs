// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{Result, ServiceError};
use crate::models::ConfigUpdate;
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "INCIDENT_FORMATTER";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub lookup: LookupConfig,
    pub registry: RegistryConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LookupConfig {
    pub geo_base_url: String,
    pub reputation_base_url: String,
    pub reputation_api_key: Option<String>,
    pub reputation_max_age_days: u32,
    pub timeout_secs: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            geo_base_url: "http://ip-api.com".to_string(),
            reputation_base_url: "https://api.abuseipdb.com/api/v2".to_string(),
            reputation_api_key: None,
            reputation_max_age_days: 90,
            timeout_secs: 10,
        }
    }
}

impl LookupConfig {
    /// A blank key counts as not provisioned.
    pub fn reputation_key(&self) -> Option<&str> {
        self.reputation_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// JSON file shaped like an admin update, merged onto the built-in registry at startup.
    pub overlay_path: Option<PathBuf>,
}

impl RegistryConfig {
    pub fn load_overlay(&self) -> Result<Option<ConfigUpdate>> {
        let Some(path) = &self.overlay_path else {
            return Ok(None);
        };

        let content = fs::read_to_string(path).map_err(|e| {
            ServiceError::Configuration(format!(
                "Cannot read registry overlay {}: {}",
                path.display(),
                e
            ))
        })?;

        let update: ConfigUpdate = serde_json::from_str(&content).map_err(|e| {
            ServiceError::Configuration(format!(
                "Invalid registry overlay {}: {}",
                path.display(),
                e
            ))
        })?;

        info!(
            "Loaded registry overlay from {} ({} field(s), {} section(s))",
            path.display(),
            update.field_config.as_ref().map_or(0, |f| f.len()),
            update.section_config.as_ref().map_or(0, |s| s.len())
        );

        Ok(Some(update))
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder
                .add_source(config::File::from(Path::new(DEFAULT_CONFIG_PATH)).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| ServiceError::Configuration(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| ServiceError::Configuration(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.lookup.timeout_secs == 0 {
            return Err(ServiceError::Configuration(
                "lookup.timeout_secs must be greater than 0".to_string(),
            ));
        }

        Validator::validate_url(&self.lookup.geo_base_url)?;
        Validator::validate_url(&self.lookup.reputation_base_url)?;

        Ok(())
    }
}
