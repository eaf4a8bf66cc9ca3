// file: src/registry/mod.rs
// description: field registry holding field and section definitions
// reference: configurable extraction rules with shallow per-key merge

pub mod defaults;
pub mod store;

pub use defaults::{CANONICAL_FIELD_ORDER, default_fields, default_sections};
pub use store::RegistryStore;

use crate::models::{ConfigSnapshot, ConfigUpdate, FieldDefinition, FieldMap, SectionMap};

#[derive(Debug, Clone, PartialEq)]
pub struct FieldRegistry {
    fields: FieldMap,
    sections: SectionMap,
}

impl FieldRegistry {
    pub fn new(fields: FieldMap, sections: SectionMap) -> Self {
        Self { fields, sections }
    }

    pub fn with_defaults() -> Self {
        Self::new(default_fields(), default_sections())
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn sections(&self) -> &SectionMap {
        &self.sections
    }

    /// Shallow merge: a submitted definition replaces the whole same-keyed entry and keeps
    /// its position; unknown keys are appended in submission order.
    pub fn merge(&mut self, update: ConfigUpdate) {
        if let Some(fields) = update.field_config {
            for (key, definition) in fields {
                self.fields.insert(key, definition);
            }
        }

        if let Some(sections) = update.section_config {
            for (key, definition) in sections {
                self.sections.insert(key, definition);
            }
        }
    }

    /// Per-request view with caller-supplied definitions layered on top.
    pub fn overlay(&self, fields: Option<&FieldMap>, sections: Option<&SectionMap>) -> Self {
        let mut registry = self.clone();
        registry.merge(ConfigUpdate {
            field_config: fields.cloned(),
            section_config: sections.cloned(),
        });
        registry
    }

    pub fn enabled_fields(&self) -> impl Iterator<Item = (&String, &FieldDefinition)> {
        self.fields.iter().filter(|(_, field)| field.enabled)
    }

    /// Sections without a definition render under their key and are enabled.
    pub fn is_section_enabled(&self, key: &str) -> bool {
        self.sections.get(key).is_none_or(|section| section.enabled)
    }

    pub fn section_label<'a>(&'a self, key: &'a str) -> &'a str {
        self.sections
            .get(key)
            .map_or(key, |section| section.display_label(key))
    }

    pub fn priority_of(&self, key: &str) -> Option<i64> {
        self.fields.get(key).and_then(|field| field.priority)
    }

    pub fn to_snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            field_config: self.fields.clone(),
            section_config: self.sections.clone(),
        }
    }
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
