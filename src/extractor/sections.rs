// file: src/extractor/sections.rs
// description: free-text block extraction for incident information and recommendations
// reference: header and boundary driven section capture

use crate::extractor::patterns::{
    ACTION_HEADER, BLANK_LINES, INCIDENT_DETAIL_MARKER, INCIDENT_INFO_BOUNDARY,
    INCIDENT_INFO_HEADER,
};
use tracing::debug;

pub struct SectionExtractor;

impl SectionExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Text after the "Incident Information" header, up to "Event Time",
    /// "Action & Recommendation" or end of text, with "Incident Detail:" removed.
    pub fn incident_information(&self, text: &str) -> Option<String> {
        let header = INCIDENT_INFO_HEADER.find(text)?;
        let rest = &text[header.end()..];

        let end = INCIDENT_INFO_BOUNDARY
            .find(rest)
            .map_or(rest.len(), |boundary| boundary.start());

        let content = INCIDENT_DETAIL_MARKER.replace_all(&rest[..end], "");
        let content = content.trim();

        if content.is_empty() {
            debug!("Incident Information header found but block is empty");
            return None;
        }

        Some(content.to_string())
    }

    /// Everything after the "Action & Recommendation" header, blank-line runs collapsed.
    pub fn action_recommendation(&self, text: &str) -> Option<String> {
        let header = ACTION_HEADER.find(text)?;
        let rest = &text[header.end()..];

        let content = BLANK_LINES.replace_all(rest, "\n");
        let content = content.trim();

        if content.is_empty() {
            debug!("Action & Recommendation header found but block is empty");
            return None;
        }

        Some(content.to_string())
    }
}

impl Default for SectionExtractor {
    fn default() -> Self {
        Self::new()
    }
}
