// file: src/lookup/reputation.rs
// description: AbuseIPDB reputation lookups
// reference: https://docs.abuseipdb.com/#check-endpoint

use crate::config::LookupConfig;
use crate::error::{Result, ServiceError};
use crate::lookup::{build_client, read_json};
use crate::utils::Validator;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

pub const MISSING_KEY_MESSAGE: &str = "AbuseIPDB API key is not configured.";

const SERVICE_NAME: &str = "Reputation service";

pub struct ReputationClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    max_age_days: u32,
}

impl ReputationClient {
    pub fn new(config: &LookupConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.timeout_secs)?,
            base_url: config.reputation_base_url.trim_end_matches('/').to_string(),
            api_key: config.reputation_key().map(str::to_string),
            max_age_days: config.reputation_max_age_days,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fails with a configuration error before any network traffic when no key is set.
    pub async fn lookup_reputation(&self, ip: &str) -> Result<Value> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ServiceError::Configuration(MISSING_KEY_MESSAGE.to_string()))?;
        let ip = Validator::validate_ip_address(ip)?;

        debug!("Reputation lookup for {}", ip);

        let response = self
            .client
            .get(format!("{}/check", self.base_url))
            .header("Key", key)
            .header("Accept", "application/json")
            .query(&[
                ("ipAddress", ip.to_string()),
                ("maxAgeInDays", self.max_age_days.to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                ServiceError::Transport(format!("{} request failed: {}", SERVICE_NAME, e))
            })?;

        let body = read_json(response, SERVICE_NAME, error_detail).await?;
        Ok(unwrap_data(body))
    }
}

/// AbuseIPDB reports failures as `{"errors": [{"detail": ...}]}`.
fn error_detail(body: &Value) -> Option<String> {
    body.get("errors")?
        .as_array()?
        .first()?
        .get("detail")?
        .as_str()
        .map(str::to_string)
}

fn unwrap_data(mut body: Value) -> Value {
    match body.get_mut("data") {
        Some(data) => data.take(),
        None => body,
    }
}
