// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod field;
pub mod filter;
pub mod report;

pub use field::{
    ExtractedField, FieldDefinition, SECTION_ACTION_RECOMMENDATION, SECTION_GENERAL,
    SECTION_INCIDENT_INFO, SectionDefinition,
};
pub use filter::FilterSpec;
pub use report::{ConfigSnapshot, ConfigUpdate, FieldMap, FormatRequest, FormatResponse, SectionMap};
