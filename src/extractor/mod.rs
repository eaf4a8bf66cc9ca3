// file: src/extractor/mod.rs
// description: field and section extraction module exports
// reference: internal module structure

pub mod matcher;
pub mod patterns;
pub mod sections;
pub mod strategy;

pub use matcher::{FieldMatch, PatternMatcher};
pub use sections::SectionExtractor;
pub use strategy::{KeywordPattern, MatchStrategy};
