// file: src/pipeline/composer.rs
// description: renders the sectioned plain-text report
// reference: fixed section order, canonical field order with extras appended

use crate::models::{
    ExtractedField, SECTION_ACTION_RECOMMENDATION, SECTION_GENERAL, SECTION_INCIDENT_INFO,
};
use crate::registry::{CANONICAL_FIELD_ORDER, FieldRegistry};
use indexmap::IndexMap;

pub const HEADER_INDENT: &str = "    ";

/// Everything the composer needs from one request.
#[derive(Debug)]
pub struct ReportParts<'a> {
    pub general: &'a IndexMap<String, ExtractedField>,
    /// Section key to the fields tagged with it, in first-match order.
    pub custom: &'a IndexMap<String, IndexMap<String, ExtractedField>>,
    pub incident_information: Option<&'a str>,
    pub action_recommendation: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedReport {
    pub text: String,
    pub sections_included: Vec<String>,
}

#[derive(Debug, Default)]
pub struct ReportComposer;

impl ReportComposer {
    pub fn new() -> Self {
        Self
    }

    pub fn compose(&self, registry: &FieldRegistry, parts: &ReportParts<'_>) -> ComposedReport {
        let mut blocks = Vec::new();
        let mut sections_included = Vec::new();

        let mut push = |key: &str, body: String| {
            if body.trim().is_empty() || !registry.is_section_enabled(key) {
                return;
            }
            blocks.push(format!(
                "{HEADER_INDENT}{}\n{}",
                registry.section_label(key),
                body
            ));
            sections_included.push(key.to_string());
        };

        push(SECTION_GENERAL, Self::field_lines(parts.general, true));

        for (section, fields) in parts.custom {
            push(section.as_str(), Self::field_lines(fields, false));
        }

        if let Some(block) = parts.incident_information {
            push(SECTION_INCIDENT_INFO, block.to_string());
        }

        if let Some(block) = parts.action_recommendation {
            push(SECTION_ACTION_RECOMMENDATION, block.to_string());
        }

        ComposedReport {
            text: blocks.join("\n\n").trim_end().to_string(),
            sections_included,
        }
    }

    fn field_lines(fields: &IndexMap<String, ExtractedField>, canonical: bool) -> String {
        let mut lines = Vec::with_capacity(fields.len());

        if canonical {
            for key in CANONICAL_FIELD_ORDER {
                if let Some(field) = fields.get(key) {
                    lines.push(field.render());
                }
            }
        }

        for (key, field) in fields {
            if canonical && CANONICAL_FIELD_ORDER.contains(&key.as_str()) {
                continue;
            }
            lines.push(field.render());
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConfigUpdate, SectionDefinition, SectionMap};
    use pretty_assertions::assert_eq;

    fn fields(entries: &[(&str, &str, &str)]) -> IndexMap<String, ExtractedField> {
        entries
            .iter()
            .map(|(key, label, value)| {
                (key.to_string(), ExtractedField::new(*label, *value).unwrap())
            })
            .collect()
    }

    #[test]
    fn test_canonical_order_then_extras() {
        let general = fields(&[
            ("hostname", "Hostname", "WS-0142"),
            ("severity", "Severity", "High"),
            ("sourceIp", "Source IP", "203.0.113.7"),
            ("category", "Category", "Malware"),
        ]);
        let custom = IndexMap::new();
        let registry = FieldRegistry::with_defaults();

        let report = ReportComposer::new().compose(
            &registry,
            &ReportParts {
                general: &general,
                custom: &custom,
                incident_information: None,
                action_recommendation: None,
            },
        );

        assert_eq!(
            report.text,
            "    Incident General Information\n\
             Category : Malware\n\
             Severity : High\n\
             Hostname : WS-0142\n\
             Source IP : 203.0.113.7"
        );
        assert_eq!(report.sections_included, vec!["general"]);
    }

    #[test]
    fn test_all_sections_in_order() {
        let general = fields(&[("category", "Category", "Malware")]);
        let mut custom = IndexMap::new();
        custom.insert(
            "network".to_string(),
            fields(&[("sourceIp", "Source IP", "203.0.113.7")]),
        );
        let registry = FieldRegistry::with_defaults();

        let report = ReportComposer::new().compose(
            &registry,
            &ReportParts {
                general: &general,
                custom: &custom,
                incident_information: Some("Host beaconed to C2."),
                action_recommendation: Some("Isolate host\nRotate credentials"),
            },
        );

        assert_eq!(
            report.text,
            "    Incident General Information\n\
             Category : Malware\n\
             \n    network\n\
             Source IP : 203.0.113.7\n\
             \n    Incident Information\n\
             Host beaconed to C2.\n\
             \n    Action & Recommendation\n\
             Isolate host\n\
             Rotate credentials"
        );
        assert_eq!(
            report.sections_included,
            vec!["general", "network", "incidentInfo", "actionRecommendation"]
        );
    }

    #[test]
    fn test_disabled_and_relabelled_sections() {
        let general = fields(&[("category", "Category", "Malware")]);
        let custom = IndexMap::new();
        let mut registry = FieldRegistry::with_defaults();

        let mut sections = SectionMap::new();
        sections.insert(
            SECTION_GENERAL.to_string(),
            SectionDefinition {
                enabled: false,
                label: "Summary".to_string(),
            },
        );
        sections.insert(
            SECTION_ACTION_RECOMMENDATION.to_string(),
            SectionDefinition::new("Next Steps"),
        );
        registry.merge(ConfigUpdate {
            field_config: None,
            section_config: Some(sections),
        });

        let report = ReportComposer::new().compose(
            &registry,
            &ReportParts {
                general: &general,
                custom: &custom,
                incident_information: None,
                action_recommendation: Some("Block sender"),
            },
        );

        assert_eq!(report.text, "    Next Steps\nBlock sender");
        assert_eq!(report.sections_included, vec!["actionRecommendation"]);
    }

    #[test]
    fn test_nothing_to_render() {
        let general = IndexMap::new();
        let custom = IndexMap::new();
        let report = ReportComposer::new().compose(
            &FieldRegistry::with_defaults(),
            &ReportParts {
                general: &general,
                custom: &custom,
                incident_information: None,
                action_recommendation: None,
            },
        );

        assert_eq!(report.text, "");
        assert!(report.sections_included.is_empty());
    }
}
