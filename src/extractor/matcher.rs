// file: src/extractor/matcher.rs
// description: registry-driven waterfall that locates each field's value
// reference: keyword synonyms crossed with ordered match strategies

use crate::extractor::strategy::{KeywordPattern, MatchStrategy};
use crate::models::{ExtractedField, FieldDefinition};
use crate::registry::FieldRegistry;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Bound on distinct keywords kept compiled; request overlays can introduce arbitrary ones.
const MAX_CACHED_KEYWORDS: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch {
    pub value: String,
    pub keyword: String,
    pub strategy: MatchStrategy,
}

pub struct PatternMatcher {
    strategies: Vec<MatchStrategy>,
    compiled: RwLock<HashMap<String, Option<Arc<KeywordPattern>>>>,
}

impl PatternMatcher {
    pub fn new() -> Self {
        Self::with_strategies(MatchStrategy::WATERFALL.to_vec())
    }

    pub fn with_strategies(strategies: Vec<MatchStrategy>) -> Self {
        Self {
            strategies,
            compiled: RwLock::new(HashMap::new()),
        }
    }

    /// Compiles a keyword's strategy regexes on first use and reuses them afterwards.
    /// Keywords that cannot form a pattern are remembered as `None`.
    pub fn pattern(&self, keyword: &str) -> Option<Arc<KeywordPattern>> {
        {
            let cache = self.compiled.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(pattern) = cache.get(keyword) {
                return pattern.clone();
            }
        }

        let pattern = KeywordPattern::new(keyword).map(Arc::new);

        let mut cache = self.compiled.write().unwrap_or_else(PoisonError::into_inner);
        if cache.len() >= MAX_CACHED_KEYWORDS {
            debug!("Keyword pattern cache full, clearing {} entries", cache.len());
            cache.clear();
        }
        cache
            .entry(keyword.to_string())
            .or_insert(pattern)
            .clone()
    }

    pub fn cached_keywords(&self) -> usize {
        self.compiled
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Keywords are the outer loop: every strategy is tried for the first synonym before
    /// the second synonym is considered.
    pub fn find(&self, field: &FieldDefinition, text: &str) -> Option<FieldMatch> {
        for keyword in &field.keywords {
            let Some(pattern) = self.pattern(keyword) else {
                continue;
            };

            for strategy in &self.strategies {
                if let Some(value) = strategy.extract(&pattern, text) {
                    return Some(FieldMatch {
                        value,
                        keyword: pattern.keyword().to_string(),
                        strategy: *strategy,
                    });
                }
            }
        }

        None
    }

    /// Runs every enabled field, in registry order. Unmatched fields are absent.
    pub fn extract_fields(
        &self,
        registry: &FieldRegistry,
        text: &str,
    ) -> IndexMap<String, ExtractedField> {
        let mut extracted = IndexMap::new();

        for (key, field) in registry.enabled_fields() {
            let Some(found) = self.find(field, text) else {
                continue;
            };

            debug!(
                "Matched field {} via {} on keyword '{}'",
                key,
                found.strategy.as_str(),
                found.keyword
            );

            if let Some(value) = ExtractedField::new(field.display_label(key), found.value) {
                extracted.insert(key.clone(), value);
            }
        }

        extracted
    }
}

impl Default for PatternMatcher {
    fn default() -> Self {
        Self::new()
    }
}
