// file: src/mcp/server.rs
// description: MCP server exposing report formatting, registry administration and ip lookups
// reference: https://docs.rs/rmcp

use crate::config::Config;
use crate::error::{Result as ServiceResult, ServiceError};
use crate::lookup::{GeoLocationClient, ReputationClient};
use crate::pipeline::ReportService;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::tool::Parameters;
use rmcp::model::*;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormatReportArgs {
    /// Raw incident report text as exported from the ticketing tool
    pub raw_text: Option<String>,
    /// Per-request field definitions layered over the registry
    pub custom_fields: Option<Value>,
    /// Filter spec: selectedFields, excludeFields, includeOnly, maxFields
    pub field_filters: Option<Value>,
    /// Per-request section definitions layered over the registry
    pub sections: Option<Value>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConfigArgs {
    /// Field definitions keyed by field key; each replaces the whole same-keyed entry
    pub field_config: Option<Value>,
    /// Section definitions keyed by section key
    pub section_config: Option<Value>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GeoLookupArgs {
    /// One address for a single lookup, several for a batch lookup (max 100)
    pub ips: Vec<String>,
    /// Comma-separated ip-api field list
    pub fields: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ReputationLookupArgs {
    /// IPv4 or IPv6 address to check
    pub ip: String,
}

#[derive(Clone)]
pub struct IncidentFormatterMcp {
    service: Arc<ReportService>,
    geo: Arc<GeoLocationClient>,
    reputation: Arc<ReputationClient>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl IncidentFormatterMcp {
    pub fn new(config: &Config) -> ServiceResult<Self> {
        Self::with_service(Arc::new(ReportService::from_config(config)?), config)
    }

    pub fn with_service(service: Arc<ReportService>, config: &Config) -> ServiceResult<Self> {
        Ok(Self {
            service,
            geo: Arc::new(GeoLocationClient::new(&config.lookup)?),
            reputation: Arc::new(ReputationClient::new(&config.lookup)?),
            tool_router: Self::tool_router(),
        })
    }

    pub fn get_tool_router(&self) -> &ToolRouter<Self> {
        &self.tool_router
    }

    #[tool(
        description = "Format a raw incident report into a sectioned plain-text report and a map of extracted fields"
    )]
    async fn format_report(
        &self,
        Parameters(args): Parameters<FormatReportArgs>,
    ) -> Result<CallToolResult, McpError> {
        info!("MCP: Formatting report");

        let mut body = Map::new();
        if let Some(raw_text) = args.raw_text {
            body.insert("rawText".to_string(), Value::String(raw_text));
        }
        for (key, value) in [
            ("customFields", args.custom_fields),
            ("fieldFilters", args.field_filters),
            ("sections", args.sections),
        ] {
            if let Some(value) = value {
                body.insert(key.to_string(), value);
            }
        }

        let response = self
            .service
            .handle_format(&Value::Object(body))
            .map_err(to_mcp_error)?;

        json_result(&response)
    }

    #[tool(description = "Get the current field and section configuration")]
    async fn get_field_config(&self) -> Result<CallToolResult, McpError> {
        info!("MCP: Getting field configuration");
        json_result(&self.service.config_snapshot())
    }

    #[tool(
        description = "Merge field and/or section definitions into the live configuration. Each submitted key replaces its whole entry."
    )]
    async fn update_field_config(
        &self,
        Parameters(args): Parameters<UpdateConfigArgs>,
    ) -> Result<CallToolResult, McpError> {
        info!("MCP: Updating field configuration");

        let mut body = Map::new();
        if let Some(fields) = args.field_config {
            body.insert("fieldConfig".to_string(), fields);
        }
        if let Some(sections) = args.section_config {
            body.insert("sectionConfig".to_string(), sections);
        }

        let snapshot = self
            .service
            .handle_config_update(&Value::Object(body))
            .map_err(to_mcp_error)?;

        json_result(&snapshot)
    }

    #[tool(description = "Look up geolocation for one IP address, or a batch of up to 100")]
    async fn lookup_geolocation(
        &self,
        Parameters(args): Parameters<GeoLookupArgs>,
    ) -> Result<CallToolResult, McpError> {
        info!("MCP: Geolocation lookup for {} address(es)", args.ips.len());

        let fields = args.fields.as_deref();
        let result = match args.ips.as_slice() {
            [ip] => self.geo.lookup(ip, fields).await,
            ips => self.geo.lookup_batch(ips, fields).await.map(Value::Array),
        }
        .map_err(to_mcp_error)?;

        json_result(&result)
    }

    #[tool(description = "Check an IP address against the AbuseIPDB reputation database")]
    async fn lookup_reputation(
        &self,
        Parameters(args): Parameters<ReputationLookupArgs>,
    ) -> Result<CallToolResult, McpError> {
        info!("MCP: Reputation lookup for {}", args.ip);

        let record = self
            .reputation
            .lookup_reputation(&args.ip)
            .await
            .map_err(to_mcp_error)?;

        json_result(&record)
    }
}

#[tool_handler]
impl ServerHandler for IncidentFormatterMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Incident report formatter: turn raw ticket exports into sectioned reports, \
                 administer the field registry, and enrich IP addresses with geolocation and reputation."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Caller mistakes become invalid-params errors; everything else is internal with a safe message.
pub fn to_mcp_error(err: ServiceError) -> McpError {
    match err.status_code() {
        400 => McpError::invalid_params(err.public_message(), None),
        _ => {
            error!("MCP tool failed: {}", err);
            McpError::internal_error(err.public_message(), None)
        }
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| to_mcp_error(ServiceError::from(e)))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}
