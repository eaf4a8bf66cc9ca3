// file: src/models/filter.rs
// description: per-request field filter specification
// reference: allow-list, deny-list, keyword search and priority cap

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_fields: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_fields: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_only: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fields: Option<usize>,
}

impl FilterSpec {
    pub fn is_empty(&self) -> bool {
        self.selected_fields.is_none()
            && self.exclude_fields.is_none()
            && self.include_only.is_none()
            && self.max_fields.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_wire_names() {
        let spec: FilterSpec =
            serde_json::from_str(r#"{"includeOnly": ["phish"], "maxFields": 3}"#).unwrap();

        assert_eq!(spec.include_only, Some(vec!["phish".to_string()]));
        assert_eq!(spec.max_fields, Some(3));
        assert!(!spec.is_empty());
        assert!(FilterSpec::default().is_empty());
    }
}
