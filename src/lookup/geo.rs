// file: src/lookup/geo.rs
// description: ip-api.com geolocation lookups, single and batch
// reference: http://ip-api.com/docs

use crate::config::LookupConfig;
use crate::error::{Result, ServiceError};
use crate::lookup::{build_client, read_json};
use crate::utils::{OperationTimer, Validator};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

pub const DEFAULT_GEO_FIELDS: &str =
    "status,message,country,countryCode,regionName,city,lat,lon,timezone,isp,org,as,query";

const SERVICE_NAME: &str = "Geolocation service";

pub struct GeoLocationClient {
    client: Client,
    base_url: String,
}

impl GeoLocationClient {
    pub fn new(config: &LookupConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.timeout_secs)?,
            base_url: config.geo_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn lookup(&self, ip: &str, fields: Option<&str>) -> Result<Value> {
        Validator::validate_ip(ip)?;

        let url = format!("{}/json/{}", self.base_url, ip.trim());
        debug!("Geolocation lookup for {}", ip);

        let response = self
            .client
            .get(&url)
            .query(&[("fields", request_fields(fields))])
            .send()
            .await
            .map_err(|e| {
                ServiceError::Transport(format!("{} request failed: {}", SERVICE_NAME, e))
            })?;

        let record = read_json(response, SERVICE_NAME, upstream_message).await?;
        interpret_record(record)
    }

    /// Per-address failures stay inside their records; only transport problems fail the batch.
    pub async fn lookup_batch(&self, ips: &[String], fields: Option<&str>) -> Result<Vec<Value>> {
        Validator::validate_ip_list(ips)?;
        let timer = OperationTimer::new("geolocation_batch");

        let url = format!("{}/batch", self.base_url);
        let body: Vec<&str> = ips.iter().map(|ip| ip.trim()).collect();

        let response = self
            .client
            .post(&url)
            .query(&[("fields", request_fields(fields))])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                ServiceError::Transport(format!("{} batch request failed: {}", SERVICE_NAME, e))
            })?;

        let records = match read_json(response, SERVICE_NAME, upstream_message).await? {
            Value::Array(records) => records,
            other => {
                return Err(ServiceError::Transport(format!(
                    "{} returned a non-array batch body: {}",
                    SERVICE_NAME,
                    Validator::truncate_text(&other.to_string(), 80)
                )));
            }
        };

        let failed = records.iter().filter(|r| is_failure(r)).count();
        if failed > 0 {
            warn!("{} of {} batch lookups failed upstream", failed, records.len());
        }

        timer.finish_with_count(records.len());
        Ok(records)
    }
}

/// `status` and `message` are always requested so failures can be recognised.
pub fn request_fields(fields: Option<&str>) -> String {
    let mut requested: Vec<&str> = fields
        .unwrap_or(DEFAULT_GEO_FIELDS)
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect();

    for required in ["message", "status"] {
        if !requested.contains(&required) {
            requested.insert(0, required);
        }
    }

    requested.join(",")
}

fn is_failure(record: &Value) -> bool {
    record.get("status").and_then(Value::as_str) == Some("fail")
}

fn upstream_message(body: &Value) -> Option<String> {
    body.get("message").and_then(Value::as_str).map(str::to_string)
}

/// A `"status": "fail"` record is a well-formed refusal and keeps the upstream reason.
pub fn interpret_record(record: Value) -> Result<Value> {
    if is_failure(&record) {
        let reason = upstream_message(&record)
            .unwrap_or_else(|| "Geolocation lookup failed".to_string());
        return Err(ServiceError::Upstream(reason));
    }
    Ok(record)
}
