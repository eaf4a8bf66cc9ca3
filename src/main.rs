// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use incident_formatter::utils::logging::{
    format_error, format_info, format_success, format_warning, init_logger,
};
use incident_formatter::{
    Config, GeoLocationClient, IncidentFormatterMcp, ReportService, ReputationClient,
};
use rmcp::ServiceExt;
use serde_json::{Value, json};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "incident_formatter")]
#[command(version)]
#[command(about = "Normalize raw incident reports into sectioned summaries", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Format a raw incident report read from a file, or "-" for stdin
    Format {
        input: PathBuf,

        /// Filter spec as JSON, e.g. '{"maxFields": 5}'
        #[arg(long, value_name = "JSON")]
        filters: Option<String>,

        /// Print the full response as JSON instead of the report text
        #[arg(long)]
        json: bool,
    },

    /// Print the active field and section configuration
    Fields,

    /// Look up geolocation for one or more IP addresses
    Geo {
        #[arg(required = true)]
        ips: Vec<String>,

        #[arg(long, value_name = "LIST")]
        fields: Option<String>,
    },

    /// Check an IP address against AbuseIPDB
    Reputation { ip: String },

    /// Start MCP (Model Context Protocol) server for agentic tool integration
    Mcp {
        #[arg(long, default_value = "stdio")]
        transport: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logger(cli.color, cli.verbose);
    colored::control::set_override(cli.color);

    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    match cli.command {
        Commands::Format {
            input,
            filters,
            json,
        } => {
            cmd_format(&config, &input, filters.as_deref(), json)?;
        }
        Commands::Fields => {
            cmd_fields(&config)?;
        }
        Commands::Geo { ips, fields } => {
            cmd_geo(&config, &ips, fields.as_deref()).await?;
        }
        Commands::Reputation { ip } => {
            cmd_reputation(&config, &ip).await?;
        }
        Commands::Mcp { transport } => {
            cmd_mcp(&config, &transport).await?;
        }
    }

    Ok(())
}

fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read report from stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read report from {}", input.display()))
    }
}

fn cmd_format(config: &Config, input: &Path, filters: Option<&str>, as_json: bool) -> Result<()> {
    let service = ReportService::from_config(config).context("Failed to build field registry")?;

    let mut body = json!({ "rawText": read_input(input)? });
    if let Some(filters) = filters {
        let filters: Value = serde_json::from_str(filters).context("--filters is not valid JSON")?;
        body["fieldFilters"] = filters;
    }

    let response = match service.handle_format(&body) {
        Ok(response) => response,
        Err(e) => {
            eprintln!("{}", format_error(&e.public_message()));
            return Err(e).context("Failed to format report");
        }
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else if response.formatted_text.is_empty() {
        eprintln!(
            "{}",
            format_warning("No recognizable fields or sections found")
        );
    } else {
        println!("{}", response.formatted_text);
        eprintln!(
            "{}",
            format_success(&format!(
                "{} field(s), sections: {}",
                response.extracted_fields.len(),
                response.sections_included.join(", ")
            ))
        );
    }

    Ok(())
}

fn cmd_fields(config: &Config) -> Result<()> {
    let service = ReportService::from_config(config).context("Failed to build field registry")?;
    println!("{}", serde_json::to_string_pretty(&service.config_snapshot())?);
    Ok(())
}

async fn cmd_geo(config: &Config, ips: &[String], fields: Option<&str>) -> Result<()> {
    let client = GeoLocationClient::new(&config.lookup)?;

    let result = if let [ip] = ips {
        client.lookup(ip, fields).await
    } else {
        client.lookup_batch(ips, fields).await.map(Value::Array)
    };

    match result {
        Ok(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", format_error(&e.public_message()));
            Err(e).context("Geolocation lookup failed")
        }
    }
}

async fn cmd_reputation(config: &Config, ip: &str) -> Result<()> {
    let client = ReputationClient::new(&config.lookup)?;

    if !client.is_configured() {
        eprintln!(
            "{}",
            format_info("Set INCIDENT_FORMATTER_LOOKUP__REPUTATION_API_KEY or lookup.reputation_api_key")
        );
    }

    match client.lookup_reputation(ip).await {
        Ok(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", format_error(&e.public_message()));
            Err(e).context("Reputation lookup failed")
        }
    }
}

async fn cmd_mcp(config: &Config, transport: &str) -> Result<()> {
    info!("Starting MCP server (transport: {})", transport);

    if transport != "stdio" {
        error!("Only stdio transport is currently supported");
        return Err(anyhow::anyhow!("Unsupported transport: {}", transport));
    }

    let mcp_server = IncidentFormatterMcp::new(config).context("Failed to build MCP server")?;

    info!("MCP server ready. Available tools:");
    for tool in mcp_server.get_tool_router().list_all() {
        info!(
            "  - {}: {}",
            tool.name,
            tool.description.as_deref().unwrap_or("No description")
        );
    }

    let service = mcp_server
        .serve(rmcp::transport::stdio())
        .await
        .context("Failed to start MCP stdio transport")?;
    service.waiting().await?;

    info!("MCP server stopped");
    Ok(())
}
