// file: src/lookup/mod.rs
// description: thin HTTP adapters for IP geolocation and reputation lookups
// reference: https://docs.rs/reqwest

pub mod geo;
pub mod reputation;

pub use geo::{DEFAULT_GEO_FIELDS, GeoLocationClient};
pub use reputation::ReputationClient;

use crate::error::{Result, ServiceError};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;

pub(crate) fn build_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ServiceError::Configuration(format!("Failed to build HTTP client: {}", e)))
}

/// Decodes a 2xx body, or classifies the failure of a non-2xx answer.
pub(crate) async fn read_json(
    response: Response,
    service: &str,
    reason: fn(&Value) -> Option<String>,
) -> Result<Value> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.ok();
        return Err(classify_failure(status, body.as_deref(), service, reason));
    }

    response.json::<Value>().await.map_err(|e| {
        ServiceError::Transport(format!("Failed to decode {} response: {}", service, e))
    })
}

/// Only a 4xx answer with a JSON body counts as a refusal of the request itself (400).
/// Server errors, unreadable bodies and non-JSON bodies are transport failures (500).
pub(crate) fn classify_failure(
    status: StatusCode,
    body: Option<&str>,
    service: &str,
    reason: fn(&Value) -> Option<String>,
) -> ServiceError {
    if status.is_server_error() {
        return ServiceError::Transport(format!("{} responded with status {}", service, status));
    }

    let Some(body) = body else {
        return ServiceError::Transport(format!(
            "Failed to read {} error body (status {})",
            service, status
        ));
    };

    match serde_json::from_str::<Value>(body) {
        Ok(value) => ServiceError::Upstream(
            reason(&value)
                .unwrap_or_else(|| format!("{} responded with status {}", service, status)),
        ),
        Err(e) => ServiceError::Transport(format!(
            "Unparseable {} error body (status {}): {}",
            service, status, e
        )),
    }
}
