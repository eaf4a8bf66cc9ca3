// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod extractor;
pub mod lookup;
pub mod mcp;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod registry;
pub mod utils;

pub use config::{Config, LookupConfig, RegistryConfig};
pub use error::{Result, ServiceError};
pub use extractor::{MatchStrategy, PatternMatcher, SectionExtractor};
pub use lookup::{GeoLocationClient, ReputationClient};
pub use mcp::IncidentFormatterMcp;
pub use models::{
    ConfigSnapshot, ConfigUpdate, ExtractedField, FieldDefinition, FilterSpec, FormatRequest,
    FormatResponse, SectionDefinition,
};
pub use parser::InputNormalizer;
pub use pipeline::{FilterPipeline, ReportComposer, ReportService};
pub use registry::{FieldRegistry, RegistryStore};
pub use utils::{OperationTimer, Validator};
