// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

pub mod composer;
pub mod filter;
pub mod service;

pub use composer::{ComposedReport, HEADER_INDENT, ReportComposer, ReportParts};
pub use filter::FilterPipeline;
pub use service::ReportService;
