// file: src/pipeline/filter.rs
// description: per-request narrowing of the extracted general fields
// reference: allow-list, deny-list, keyword search, priority cap (in that order)

use crate::models::{ExtractedField, FilterSpec};
use crate::registry::FieldRegistry;
use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::debug;

pub type FieldSet = IndexMap<String, ExtractedField>;

pub struct FilterPipeline<'a> {
    spec: &'a FilterSpec,
}

impl<'a> FilterPipeline<'a> {
    pub fn new(spec: &'a FilterSpec) -> Self {
        Self { spec }
    }

    /// Each stage consumes the previous stage's output. Survivors keep encounter order.
    pub fn apply(&self, fields: FieldSet, registry: &FieldRegistry) -> FieldSet {
        if self.spec.is_empty() {
            return fields;
        }

        let before = fields.len();
        let fields = self.allow(fields);
        let fields = self.deny(fields);
        let fields = self.search(fields);
        let fields = self.cap(fields, registry);

        debug!("Field filters kept {} of {} field(s)", fields.len(), before);
        fields
    }

    fn allow(&self, fields: FieldSet) -> FieldSet {
        let Some(allowed) = &self.spec.selected_fields else {
            return fields;
        };
        let allowed: HashSet<&str> = allowed.iter().map(String::as_str).collect();

        fields
            .into_iter()
            .filter(|(key, _)| allowed.contains(key.as_str()))
            .collect()
    }

    fn deny(&self, fields: FieldSet) -> FieldSet {
        let Some(denied) = &self.spec.exclude_fields else {
            return fields;
        };
        let denied: HashSet<&str> = denied.iter().map(String::as_str).collect();

        fields
            .into_iter()
            .filter(|(key, _)| !denied.contains(key.as_str()))
            .collect()
    }

    fn search(&self, fields: FieldSet) -> FieldSet {
        let Some(keywords) = &self.spec.include_only else {
            return fields;
        };
        let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

        fields
            .into_iter()
            .filter(|(_, field)| {
                let label = field.label.to_lowercase();
                let value = field.value.to_lowercase();
                keywords
                    .iter()
                    .any(|keyword| label.contains(keyword) || value.contains(keyword))
            })
            .collect()
    }

    /// Lowest priority number first, missing priority last, ties by encounter order.
    fn cap(&self, fields: FieldSet, registry: &FieldRegistry) -> FieldSet {
        let Some(max) = self.spec.max_fields else {
            return fields;
        };
        if fields.len() <= max {
            return fields;
        }

        let mut ranked: Vec<(usize, Option<i64>)> = fields
            .keys()
            .enumerate()
            .map(|(index, key)| (index, registry.priority_of(key)))
            .collect();
        ranked.sort_by_key(|(_, priority)| (priority.is_none(), *priority));

        let keep: HashSet<usize> = ranked.into_iter().take(max).map(|(i, _)| i).collect();

        fields
            .into_iter()
            .enumerate()
            .filter(|(index, _)| keep.contains(index))
            .map(|(_, entry)| entry)
            .collect()
    }
}
