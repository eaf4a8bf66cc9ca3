// file: src/registry/store.rs
// description: shared registry handle with read-copy-update semantics
// reference: snapshot readers, serialized copy-and-swap writers

use crate::models::ConfigUpdate;
use crate::registry::FieldRegistry;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

/// Readers hold an `Arc` snapshot for a whole request; writers publish a fully merged copy.
#[derive(Debug)]
pub struct RegistryStore {
    current: RwLock<Arc<FieldRegistry>>,
}

impl RegistryStore {
    pub fn new(registry: FieldRegistry) -> Self {
        Self {
            current: RwLock::new(Arc::new(registry)),
        }
    }

    pub fn snapshot(&self) -> Arc<FieldRegistry> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Merges `update` into a private copy and swaps it in. Concurrent writers are serialized
    /// by the write lock, so no update is lost and no reader sees half of one.
    pub fn apply(&self, update: ConfigUpdate) -> Arc<FieldRegistry> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);

        let mut next = FieldRegistry::clone(&guard);
        let field_count = update.field_config.as_ref().map_or(0, |f| f.len());
        let section_count = update.section_config.as_ref().map_or(0, |s| s.len());
        next.merge(update);

        let next = Arc::new(next);
        *guard = Arc::clone(&next);

        info!(
            "Registry updated: {} field(s), {} section(s) replaced",
            field_count, section_count
        );
        next
    }
}

impl Default for RegistryStore {
    fn default() -> Self {
        Self::new(FieldRegistry::with_defaults())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldDefinition, FieldMap};

    #[test]
    fn test_snapshot_unaffected_by_later_update() {
        let store = RegistryStore::default();
        let before = store.snapshot();

        let mut fields = FieldMap::new();
        fields.insert(
            "severity".to_string(),
            FieldDefinition::new(&["Criticality"], "Criticality", 4),
        );
        store.apply(ConfigUpdate {
            field_config: Some(fields),
            section_config: None,
        });

        assert_eq!(before.fields()["severity"].label, "Severity");
        assert_eq!(store.snapshot().fields()["severity"].label, "Criticality");
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() {
        let store = Arc::new(RegistryStore::default());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    let mut fields = FieldMap::new();
                    fields.insert(
                        format!("custom{i}"),
                        FieldDefinition::new(&["Custom"], "Custom", 100 + i),
                    );
                    store.apply(ConfigUpdate {
                        field_config: Some(fields),
                        section_config: None,
                    });
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = store.snapshot();
        for i in 0..8 {
            assert!(snapshot.fields().contains_key(&format!("custom{i}")));
        }
    }
}
