// file: src/models/field.rs
// description: field and section definitions driving extraction and rendering
// reference: configurable label/value extraction rules

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const SECTION_GENERAL: &str = "general";
pub const SECTION_INCIDENT_INFO: &str = "incidentInfo";
pub const SECTION_ACTION_RECOMMENDATION: &str = "actionRecommendation";

fn default_enabled() -> bool {
    true
}

fn default_section() -> String {
    SECTION_GENERAL.to_string()
}

/// Anything other than an array of strings leaves the field with nothing to match on.
fn lenient_keywords<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let keywords = match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(keyword) => Some(keyword),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };
    Ok(keywords)
}

/// A priority that is not an integer counts as missing and sorts last.
fn lenient_priority<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_i64())
}

/// One configurable extraction rule. Keywords are synonyms tried in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    #[serde(default, deserialize_with = "lenient_keywords")]
    pub keywords: Vec<String>,
    #[serde(default = "default_section")]
    pub section: String,
    #[serde(default)]
    pub label: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(
        default,
        deserialize_with = "lenient_priority",
        skip_serializing_if = "Option::is_none"
    )]
    pub priority: Option<i64>,
}

impl FieldDefinition {
    pub fn new(keywords: &[&str], label: &str, priority: i64) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            section: default_section(),
            label: label.to_string(),
            enabled: true,
            priority: Some(priority),
        }
    }

    pub fn in_section(mut self, section: &str) -> Self {
        self.section = section.to_string();
        self
    }

    pub fn is_general(&self) -> bool {
        self.section == SECTION_GENERAL
    }

    /// Falls back to the field key when no label was configured.
    pub fn display_label<'a>(&'a self, key: &'a str) -> &'a str {
        if self.label.trim().is_empty() {
            key
        } else {
            &self.label
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionDefinition {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub label: String,
}

impl SectionDefinition {
    pub fn new(label: &str) -> Self {
        Self {
            enabled: true,
            label: label.to_string(),
        }
    }

    pub fn display_label<'a>(&'a self, key: &'a str) -> &'a str {
        if self.label.trim().is_empty() {
            key
        } else {
            &self.label
        }
    }
}

/// A matched field. The value is always non-empty and trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedField {
    pub label: String,
    pub value: String,
}

impl ExtractedField {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Option<Self> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            return None;
        }
        Some(Self {
            label: label.into(),
            value,
        })
    }

    pub fn render(&self) -> String {
        format!("{} : {}", self.label, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_definition_defaults() {
        let field: FieldDefinition =
            serde_json::from_str(r#"{"keywords": ["Hostname"], "label": "Host"}"#).unwrap();

        assert!(field.enabled);
        assert!(field.is_general());
        assert_eq!(field.priority, None);
    }

    #[test]
    fn test_malformed_keywords_and_priority_are_accepted() {
        for raw in [
            r#"{"keywords": "Ticket ID", "priority": "high"}"#,
            r#"{"keywords": null, "priority": 2.5}"#,
            r#"{"keywords": {"first": "Ticket ID"}, "priority": [1]}"#,
        ] {
            let field: FieldDefinition = serde_json::from_str(raw).unwrap();
            assert!(field.keywords.is_empty(), "input: {raw}");
            assert_eq!(field.priority, None, "input: {raw}");
        }

        let field: FieldDefinition =
            serde_json::from_str(r#"{"keywords": ["Ticket ID", 7, null, "Case"], "priority": -3}"#)
                .unwrap();
        assert_eq!(field.keywords, vec!["Ticket ID", "Case"]);
        assert_eq!(field.priority, Some(-3));
    }

    #[test]
    fn test_display_label_falls_back_to_key() {
        let field: FieldDefinition = serde_json::from_str(r#"{"keywords": ["Rule"]}"#).unwrap();
        assert_eq!(field.display_label("ruleName"), "ruleName");
    }

    #[test]
    fn test_extracted_field_rejects_blank_value() {
        assert!(ExtractedField::new("Category", "   ").is_none());

        let field = ExtractedField::new("Category", "  Malware ").unwrap();
        assert_eq!(field.value, "Malware");
        assert_eq!(field.render(), "Category : Malware");
    }
}
