// file: src/utils/validation.rs
// description: request payload and lookup argument validation
// reference: input validation patterns

use crate::error::{Result, ServiceError};
use serde_json::Value;
use std::net::IpAddr;

pub const RAW_TEXT_REQUIRED: &str = r#"Request body must contain a "rawText" string."#;
pub const CONFIG_PAYLOAD_REQUIRED: &str =
    r#"Request body must contain "fieldConfig" and/or "sectionConfig"."#;
pub const MAX_BATCH_IPS: usize = 100;

pub struct Validator;

impl Validator {
    /// `rawText` must be present, a string, and not empty. Whitespace-only text is allowed.
    pub fn raw_text(body: &Value) -> Result<&str> {
        match body.get("rawText").and_then(Value::as_str) {
            Some(text) if !text.is_empty() => Ok(text),
            _ => Err(ServiceError::InvalidInput(RAW_TEXT_REQUIRED.to_string())),
        }
    }

    /// At least one of the two maps must be present, and each present one must be an object.
    pub fn config_update(body: &Value) -> Result<()> {
        let field_config = body.get("fieldConfig").filter(|v| !v.is_null());
        let section_config = body.get("sectionConfig").filter(|v| !v.is_null());

        if field_config.is_none() && section_config.is_none() {
            return Err(ServiceError::InvalidInput(
                CONFIG_PAYLOAD_REQUIRED.to_string(),
            ));
        }

        for (name, value) in [("fieldConfig", field_config), ("sectionConfig", section_config)] {
            if value.is_some_and(|v| !v.is_object()) {
                return Err(ServiceError::InvalidInput(format!(
                    r#""{}" must be an object keyed by identifier."#,
                    name
                )));
            }
        }

        Ok(())
    }

    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ServiceError::Configuration(format!(
                "Invalid URL format: {}",
                url
            )));
        }
        Ok(())
    }

    pub fn validate_ip(ip: &str) -> Result<()> {
        if ip.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "An IP address is required.".to_string(),
            ));
        }
        // Hostnames are accepted by the geolocation upstream, so only reject obvious junk.
        if ip.contains(['/', '?', '#', ' ']) {
            return Err(ServiceError::InvalidInput(format!(
                "Invalid IP address: {}",
                ip
            )));
        }
        Ok(())
    }

    pub fn validate_ip_address(ip: &str) -> Result<IpAddr> {
        ip.trim()
            .parse::<IpAddr>()
            .map_err(|_| ServiceError::InvalidInput(format!("Invalid IP address: {}", ip)))
    }

    pub fn validate_ip_list(ips: &[String]) -> Result<()> {
        if ips.is_empty() {
            return Err(ServiceError::InvalidInput(
                "Request body must contain a non-empty \"ips\" array.".to_string(),
            ));
        }

        if ips.len() > MAX_BATCH_IPS {
            return Err(ServiceError::InvalidInput(format!(
                "Batch lookups accept at most {} addresses",
                MAX_BATCH_IPS
            )));
        }

        for ip in ips {
            Self::validate_ip(ip)?;
        }

        Ok(())
    }

    /// Char-boundary safe preview for log lines.
    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            None => text.to_string(),
            Some((end, _)) => format!("{}...", &text[..end]),
        }
    }
}
