// file: src/models/report.rs
// description: request and response envelopes for formatting and administration
// reference: json wire contract of the formatter service

use crate::models::{ExtractedField, FieldDefinition, FilterSpec, SectionDefinition};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub type FieldMap = IndexMap<String, FieldDefinition>;
pub type SectionMap = IndexMap<String, SectionDefinition>;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatRequest {
    pub raw_text: String,
    #[serde(default)]
    pub custom_fields: Option<FieldMap>,
    #[serde(default)]
    pub field_filters: Option<FilterSpec>,
    #[serde(default)]
    pub sections: Option<SectionMap>,
}

impl FormatRequest {
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            ..Default::default()
        }
    }

    pub fn with_filters(mut self, filters: FilterSpec) -> Self {
        self.field_filters = Some(filters);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatResponse {
    pub formatted_text: String,
    pub extracted_fields: IndexMap<String, ExtractedField>,
    pub applied_filters: FilterSpec,
    pub sections_included: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSnapshot {
    pub field_config: FieldMap,
    pub section_config: SectionMap,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigUpdate {
    #[serde(default)]
    pub field_config: Option<FieldMap>,
    #[serde(default)]
    pub section_config: Option<SectionMap>,
}

impl ConfigUpdate {
    pub fn is_empty(&self) -> bool {
        self.field_config.is_none() && self.section_config.is_none()
    }
}
