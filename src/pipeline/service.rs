// file: src/pipeline/service.rs
// description: report formatting service owning the live field registry
// reference: normalize, extract, filter, compose over one registry snapshot

use crate::config::Config;
use crate::error::{Result, ServiceError};
use crate::extractor::{PatternMatcher, SectionExtractor};
use crate::models::{
    ConfigSnapshot, ConfigUpdate, ExtractedField, FormatRequest, FormatResponse,
};
use crate::parser::InputNormalizer;
use crate::pipeline::composer::{ReportComposer, ReportParts};
use crate::pipeline::filter::FilterPipeline;
use crate::registry::{FieldRegistry, RegistryStore};
use crate::utils::{OperationTimer, Validator};
use indexmap::IndexMap;
use serde_json::Value;
use std::any::Any;
use std::borrow::Cow;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;
use tracing::{debug, error, info, info_span};
use uuid::Uuid;

const SLOW_FORMAT_THRESHOLD: Duration = Duration::from_millis(250);

pub struct ReportService {
    registry: RegistryStore,
    normalizer: InputNormalizer,
    matcher: PatternMatcher,
    sections: SectionExtractor,
    composer: ReportComposer,
}

impl ReportService {
    pub fn new(registry: FieldRegistry) -> Self {
        Self {
            registry: RegistryStore::new(registry),
            normalizer: InputNormalizer::new(),
            matcher: PatternMatcher::new(),
            sections: SectionExtractor::new(),
            composer: ReportComposer::new(),
        }
    }

    /// Built-in defaults with the configured overlay file merged on top.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut registry = FieldRegistry::with_defaults();
        if let Some(update) = config.registry.load_overlay()? {
            registry.merge(update);
        }
        Ok(Self::new(registry))
    }

    /// JSON entry point: validates the body, then formats with panics contained.
    pub fn handle_format(&self, body: &Value) -> Result<FormatResponse> {
        let raw_text = Validator::raw_text(body)?;

        let request: FormatRequest = serde_json::from_value(body.clone())
            .map_err(|e| ServiceError::InvalidInput(format!("Invalid request body: {}", e)))?;

        let request_id = Uuid::new_v4();
        let span = info_span!("format_report", %request_id);
        let _enter = span.enter();

        info!(
            "Formatting report ({} chars): {}",
            raw_text.chars().count(),
            Validator::truncate_text(raw_text.trim(), 40)
        );

        guarded(|| self.format(&request))
    }

    pub fn format(&self, request: &FormatRequest) -> FormatResponse {
        let timer = OperationTimer::new("format_report");

        let base = self.registry.snapshot();
        let registry = if request.custom_fields.is_some() || request.sections.is_some() {
            Cow::Owned(base.overlay(request.custom_fields.as_ref(), request.sections.as_ref()))
        } else {
            Cow::Borrowed(base.as_ref())
        };

        let text = self.normalizer.normalize(&request.raw_text);
        let extracted = self.matcher.extract_fields(&registry, &text);
        timer.checkpoint("fields matched");

        let mut general = IndexMap::new();
        let mut custom: IndexMap<String, IndexMap<String, ExtractedField>> = IndexMap::new();
        for (key, field) in &extracted {
            match registry.fields().get(key) {
                Some(definition) if !definition.is_general() => {
                    custom
                        .entry(definition.section.clone())
                        .or_default()
                        .insert(key.clone(), field.clone());
                }
                _ => {
                    general.insert(key.clone(), field.clone());
                }
            }
        }

        let applied_filters = request.field_filters.clone().unwrap_or_default();
        let general = FilterPipeline::new(&applied_filters).apply(general, &registry);

        let incident_information = self.sections.incident_information(&text);
        let action_recommendation = self.sections.action_recommendation(&text);
        timer.checkpoint("sections extracted");

        let report = self.composer.compose(
            &registry,
            &ReportParts {
                general: &general,
                custom: &custom,
                incident_information: incident_information.as_deref(),
                action_recommendation: action_recommendation.as_deref(),
            },
        );

        let extracted_fields = extracted
            .into_iter()
            .filter(|(key, _)| {
                general.contains_key(key) || custom.values().any(|s| s.contains_key(key))
            })
            .collect::<IndexMap<_, _>>();

        debug!(
            "Report composed: {} field(s), sections {:?}",
            extracted_fields.len(),
            report.sections_included
        );
        timer.warn_if_slow(SLOW_FORMAT_THRESHOLD, "report formatting");
        timer.finish();

        FormatResponse {
            formatted_text: report.text,
            extracted_fields,
            applied_filters,
            sections_included: report.sections_included,
        }
    }

    pub fn config_snapshot(&self) -> ConfigSnapshot {
        self.registry.snapshot().to_snapshot()
    }

    pub fn handle_config_update(&self, body: &Value) -> Result<ConfigSnapshot> {
        Validator::config_update(body)?;

        let update: ConfigUpdate = serde_json::from_value(body.clone())
            .map_err(|e| ServiceError::InvalidInput(format!("Invalid configuration: {}", e)))?;

        Ok(self.update_config(update))
    }

    pub fn update_config(&self, update: ConfigUpdate) -> ConfigSnapshot {
        self.registry.apply(update).to_snapshot()
    }
}

impl Default for ReportService {
    fn default() -> Self {
        Self::new(FieldRegistry::with_defaults())
    }
}

/// Runs `work`, turning a panic into an extraction fault. The detail is logged, never returned.
fn guarded<T>(work: impl FnOnce() -> T) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(work)).map_err(|payload| {
        let detail = panic_detail(payload.as_ref());
        error!("Report formatting failed: {}", detail);
        ServiceError::Extraction(detail)
    })
}

fn panic_detail(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::INTERNAL_ERROR_MESSAGE;
    use crate::models::{FieldDefinition, FieldMap, FilterSpec, SectionDefinition, SectionMap};
    use crate::utils::validation::{CONFIG_PAYLOAD_REQUIRED, RAW_TEXT_REQUIRED};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;
    use std::thread;

    const SAMPLE: &str = "Category : Malware\nSub Category: Phishing\n\nAction & Recommendation\nBlock sender\n\nBlock domain";

    const FULL_REPORT: &str = "**Incident Category:** Malware\n\
        **Severity:**\nHigh\n\
        Hostname : WS-0142\n\
        Source IP : 203.0.113.7\n\
        \n\
        **Incident Information**\n\
        **Incident Detail:** Beacon to known C2 over HTTPS.\n\
        Event Time : 2024-03-01 09:12\n\
        \n\
        **Action & Recommendation**\n\
        Isolate WS-0142\n\
        \n\
        \n\
        Reset the user's credentials\n\
        \n\
        Graph: outbound bytes per minute\n\
        Severity : Low\n";

    #[test]
    fn test_end_to_end_sample() {
        let service = ReportService::default();
        let response = service.handle_format(&json!({ "rawText": SAMPLE })).unwrap();

        assert_eq!(
            response.formatted_text,
            "    Incident General Information\n\
             Category : Malware\n\
             Sub Categories : Phishing\n\
             \n    Action & Recommendation\n\
             Block sender\n\
             Block domain"
        );
        assert_eq!(
            response.extracted_fields.keys().collect::<Vec<_>>(),
            vec!["category", "subCategories"]
        );
        assert_eq!(response.sections_included, vec!["general", "actionRecommendation"]);
        assert!(response.applied_filters.is_empty());
    }

    #[test]
    fn test_full_report_with_cutoff() {
        let service = ReportService::default();
        let response = service.format(&FormatRequest::new(FULL_REPORT));

        assert_eq!(
            response.formatted_text,
            "    Incident General Information\n\
             Category : Malware\n\
             Severity : High\n\
             Source IP : 203.0.113.7\n\
             Hostname : WS-0142\n\
             \n    Incident Information\n\
             Beacon to known C2 over HTTPS.\n\
             \n    Action & Recommendation\n\
             Isolate WS-0142\n\
             Reset the user's credentials"
        );
        assert_eq!(response.extracted_fields["severity"].value, "High");
        assert!(!response.formatted_text.contains("Graph"));
        assert!(!response.formatted_text.contains("Low"));
    }

    #[test]
    fn test_formatting_is_idempotent() {
        let service = ReportService::default();
        let request = FormatRequest::new(FULL_REPORT);
        assert_eq!(service.format(&request), service.format(&request));
    }

    #[test]
    fn test_missing_or_empty_raw_text() {
        let service = ReportService::default();
        for body in [json!({}), json!({ "rawText": "" }), json!({ "rawText": 7 })] {
            let err = service.handle_format(&body).unwrap_err();
            assert_eq!(err.status_code(), 400);
            assert_eq!(err.public_message(), RAW_TEXT_REQUIRED);
        }
    }

    #[test]
    fn test_malformed_options_are_input_errors() {
        let service = ReportService::default();
        let err = service
            .handle_format(&json!({ "rawText": "x", "fieldFilters": { "maxFields": "two" } }))
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_unrecognised_content() {
        let service = ReportService::default();
        let response = service
            .handle_format(&json!({ "rawText": "nothing to see here\njust prose" }))
            .unwrap();

        assert_eq!(response.formatted_text, "");
        assert!(response.extracted_fields.is_empty());
        assert!(response.sections_included.is_empty());
    }

    #[test]
    fn test_filters_echoed_and_applied() {
        let service = ReportService::default();
        let filters = FilterSpec {
            max_fields: Some(2),
            ..Default::default()
        };
        let response = service.format(&FormatRequest::new(FULL_REPORT).with_filters(filters.clone()));

        assert_eq!(response.applied_filters, filters);
        assert_eq!(
            response.extracted_fields.keys().collect::<Vec<_>>(),
            vec!["category", "severity"]
        );
        assert!(!response.formatted_text.contains("Hostname"));
    }

    #[test]
    fn test_include_only_over_label_and_value() {
        let service = ReportService::default();
        let response = service
            .handle_format(&json!({
                "rawText": FULL_REPORT,
                "fieldFilters": { "includeOnly": ["ws-0142", "SEVERITY"] }
            }))
            .unwrap();

        assert_eq!(
            response.extracted_fields.keys().collect::<Vec<_>>(),
            vec!["severity", "hostname"]
        );
    }

    #[test]
    fn test_request_overlay_is_scoped_to_request() {
        let service = ReportService::default();
        let body = json!({
            "rawText": "Ticket ID : INC-7\nCategory : Malware\nSource IP : 203.0.113.7",
            "customFields": {
                "ticketId": { "keywords": ["Ticket ID"], "label": "Ticket", "priority": 0 },
                "sourceIp": { "keywords": ["Source IP"], "label": "Source IP", "section": "network" }
            },
            "sections": {
                "network": { "label": "Network Indicators" }
            }
        });

        let response = service.handle_format(&body).unwrap();
        assert_eq!(
            response.formatted_text,
            "    Incident General Information\n\
             Category : Malware\n\
             Ticket : INC-7\n\
             \n    Network Indicators\n\
             Source IP : 203.0.113.7"
        );
        assert_eq!(response.sections_included, vec!["general", "network"]);

        let snapshot = service.config_snapshot();
        assert!(!snapshot.field_config.contains_key("ticketId"));
        assert_eq!(snapshot.field_config["sourceIp"].section, "general");
    }

    #[test]
    fn test_update_config_changes_later_requests() {
        let service = ReportService::default();

        let mut sections = SectionMap::new();
        sections.insert(
            "actionRecommendation".to_string(),
            SectionDefinition {
                enabled: false,
                label: "Action & Recommendation".to_string(),
            },
        );
        let mut fields = FieldMap::new();
        fields.insert(
            "category".to_string(),
            FieldDefinition::new(&["Category"], "Incident Type", 1),
        );

        let snapshot = service.update_config(ConfigUpdate {
            field_config: Some(fields),
            section_config: Some(sections),
        });
        assert_eq!(snapshot.field_config["category"].label, "Incident Type");
        assert_eq!(
            snapshot.field_config["subCategories"],
            FieldRegistry::with_defaults().fields()["subCategories"]
        );

        let response = service.format(&FormatRequest::new(SAMPLE));
        assert_eq!(
            response.formatted_text,
            "    Incident General Information\n\
             Incident Type : Malware\n\
             Sub Categories : Phishing"
        );
    }

    #[test]
    fn test_handle_config_update_validation() {
        let service = ReportService::default();

        let err = service.handle_config_update(&json!({})).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.public_message(), CONFIG_PAYLOAD_REQUIRED);

        let err = service
            .handle_config_update(&json!({ "fieldConfig": { "x": { "enabled": "yes" } } }))
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(service.config_snapshot(), FieldRegistry::with_defaults().to_snapshot());

        let snapshot = service
            .handle_config_update(&json!({
                "fieldConfig": { "ticketId": { "keywords": ["Ticket ID"], "label": "Ticket" } }
            }))
            .unwrap();
        assert_eq!(snapshot.field_config.keys().last().unwrap(), "ticketId");
    }

    #[test]
    fn test_malformed_definitions_accepted_but_inert() {
        let service = ReportService::default();

        let snapshot = service
            .handle_config_update(&json!({
                "fieldConfig": {
                    "ticketId": { "keywords": ["Ticket ID"], "label": "Ticket", "priority": "high" },
                    "caseRef": { "keywords": "Case Ref", "label": "Case", "priority": 2.5 }
                }
            }))
            .unwrap();
        assert_eq!(snapshot.field_config["ticketId"].priority, None);
        assert!(snapshot.field_config["caseRef"].keywords.is_empty());

        let text = "Ticket ID : INC-7\nCase Ref : CR-1\nCategory : Malware\nSeverity : High";
        let response = service.format(&FormatRequest::new(text));
        assert!(!response.extracted_fields.contains_key("caseRef"));
        assert_eq!(response.extracted_fields["ticketId"].value, "INC-7");

        let capped = service.format(&FormatRequest::new(text).with_filters(FilterSpec {
            max_fields: Some(2),
            ..Default::default()
        }));
        assert_eq!(
            capped.extracted_fields.keys().collect::<Vec<_>>(),
            vec!["category", "severity"]
        );
    }

    #[test]
    fn test_concurrent_format_and_update() {
        let service = Arc::new(ReportService::default());

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let service = Arc::clone(&service);
                thread::spawn(move || {
                    if i % 2 == 0 {
                        let mut fields = FieldMap::new();
                        fields.insert(
                            format!("extra{i}"),
                            FieldDefinition::new(&["Extra"], "Extra", 50),
                        );
                        service.update_config(ConfigUpdate {
                            field_config: Some(fields),
                            section_config: None,
                        });
                    } else {
                        let response = service.format(&FormatRequest::new(SAMPLE));
                        assert!(response.formatted_text.contains("Category : Malware"));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = service.config_snapshot();
        assert!(snapshot.field_config.contains_key("extra0"));
        assert!(snapshot.field_config.contains_key("extra2"));
    }

    #[test]
    fn test_panics_become_generic_extraction_faults() {
        let err = guarded(|| -> u8 { panic!("index out of bounds") }).unwrap_err();

        assert!(matches!(err, ServiceError::Extraction(ref d) if d == "index out of bounds"));
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.public_message(), INTERNAL_ERROR_MESSAGE);
        assert_eq!(guarded(|| 7).unwrap(), 7);
    }

    #[test]
    fn test_from_config_applies_overlay() {
        use std::io::Write;

        let mut overlay = tempfile::NamedTempFile::new().unwrap();
        write!(
            overlay,
            r#"{{"sectionConfig": {{"general": {{"enabled": true, "label": "Summary"}}}}}}"#
        )
        .unwrap();

        let mut config = Config::default_config();
        config.registry.overlay_path = Some(overlay.path().to_path_buf());

        let service = ReportService::from_config(&config).unwrap();
        let response = service.format(&FormatRequest::new("Severity : High"));
        assert_eq!(response.formatted_text, "    Summary\nSeverity : High");
    }
}
