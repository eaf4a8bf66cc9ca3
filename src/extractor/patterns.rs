// file: src/extractor/patterns.rs
// description: compiled regex patterns shared by the field and section extractors
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;

/// Literal emphasis delimiters. Never case-folded.
pub const EMPHASIS: &str = r"(?:\*\*|__)";

lazy_static! {
    // Preprocessing
    pub static ref CUTOFF_MARKER: Regex = Regex::new(
        r"(?m)^[ \t]*(?i:graph|additional detail)"
    ).expect("CUTOFF_MARKER regex is valid");

    // Label detection. A label colon ends the cell or is followed by blanks, so `http://host` is a value.
    pub static ref LABEL_CELL: Regex = Regex::new(
        r"^[ \t]*[A-Za-z][A-Za-z0-9 _/&().#-]*?[ \t]*:(?:[ \t]|$)"
    ).expect("LABEL_CELL regex is valid");

    pub static ref LABEL_AHEAD: Regex = Regex::new(
        r"^[ \t]+[A-Z][A-Za-z]*(?:[ \t]+[A-Z][A-Za-z]*){0,3}[ \t]*:"
    ).expect("LABEL_AHEAD regex is valid");

    pub static ref EMPHASIZED_LABEL: Regex = Regex::new(
        r"^[ \t]*(?:\*\*|__)[^*_\n:]+(?:\*\*|__)?[ \t]*:"
    ).expect("EMPHASIZED_LABEL regex is valid");

    pub static ref EMPHASIZED_LABEL_LINE: Regex = Regex::new(
        r"(?m)^[ \t]*(?:\*\*|__)[^*_\n:]+(?:\*\*|__)?[ \t]*:"
    ).expect("EMPHASIZED_LABEL_LINE regex is valid");

    // Whitespace collapsing
    pub static ref BLANK_LINE_RUN: Regex = Regex::new(
        r"\n[ \t]*\n(?:[ \t]*\n)+"
    ).expect("BLANK_LINE_RUN regex is valid");

    pub static ref BLANK_LINES: Regex = Regex::new(
        r"\n(?:[ \t]*\n)+"
    ).expect("BLANK_LINES regex is valid");

    // Free-text sections
    pub static ref INCIDENT_INFO_HEADER: Regex = Regex::new(
        r"(?m)^[ \t]*(?:\*\*|__)?[ \t]*(?i:incident[ \t]+information)[ \t]*(?:\*\*|__)?[ \t]*:?[ \t]*(?:\*\*|__)?[ \t]*"
    ).expect("INCIDENT_INFO_HEADER regex is valid");

    pub static ref INCIDENT_INFO_BOUNDARY: Regex = Regex::new(
        r"(?m)^[ \t]*(?:\*\*|__)?[ \t]*(?i:event[ \t]+time|action[ \t]*&[ \t]*recommendations?)"
    ).expect("INCIDENT_INFO_BOUNDARY regex is valid");

    pub static ref INCIDENT_DETAIL_MARKER: Regex = Regex::new(
        r"(?:\*\*|__)?[ \t]*(?i:incident[ \t]+details?)[ \t]*(?:\*\*|__)?[ \t]*:[ \t]*(?:\*\*|__)?"
    ).expect("INCIDENT_DETAIL_MARKER regex is valid");

    pub static ref ACTION_HEADER: Regex = Regex::new(
        r"(?m)^[ \t]*(?:\*\*|__)?[ \t]*(?i:action[ \t]*&[ \t]*recommendations?)[ \t]*(?:\*\*|__)?[ \t]*:?[ \t]*(?:\*\*|__)?[ \t]*"
    ).expect("ACTION_HEADER regex is valid");
}

/// True when the text starting at `rest` opens with a capitalised `Word(s) :` label.
pub fn starts_with_label(rest: &str) -> bool {
    LABEL_AHEAD.is_match(rest)
}
