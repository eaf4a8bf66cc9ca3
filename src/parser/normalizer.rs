// file: src/parser/normalizer.rs
// description: input normalization and telemetry cutoff before extraction
// reference: ticketing export layout (graph dumps trail the report body)

use crate::extractor::patterns::CUTOFF_MARKER;
use tracing::debug;

pub struct InputNormalizer;

impl InputNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, content: &str) -> String {
        let unified = self.normalize_line_breaks(content);
        self.apply_cutoff(&unified).to_string()
    }

    fn normalize_line_breaks(&self, content: &str) -> String {
        content.replace("\r\n", "\n").replace('\r', "\n")
    }

    /// Drops everything from the first "Graph..." or "Additional detail..." line onward.
    pub fn apply_cutoff<'a>(&self, content: &'a str) -> &'a str {
        match CUTOFF_MARKER.find(content) {
            Some(marker) => {
                debug!(
                    "Cutoff marker found at byte {}, discarding {} trailing bytes",
                    marker.start(),
                    content.len() - marker.start()
                );
                &content[..marker.start()]
            }
            None => content,
        }
    }
}

impl Default for InputNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
