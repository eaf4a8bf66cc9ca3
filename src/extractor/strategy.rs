// file: src/extractor/strategy.rs
// description: interchangeable label/value matching strategies ordered by specificity
// reference: https://docs.rs/regex

use crate::extractor::patterns::{
    BLANK_LINE_RUN, EMPHASIS, EMPHASIZED_LABEL, EMPHASIZED_LABEL_LINE, LABEL_CELL,
    starts_with_label,
};
use regex::Regex;
use serde::Serialize;
use tracing::debug;

/// A keyword synonym with every strategy's regex compiled once. Only the keyword text is
/// case-folded; surrounding structure (colons, emphasis delimiters) stays literal.
#[derive(Debug, Clone)]
pub struct KeywordPattern {
    keyword: String,
    fragment: String,
    compiled: CompiledStrategies,
}

#[derive(Debug, Clone)]
struct CompiledStrategies {
    tabular_cell: Regex,
    emphasis_same_line: Regex,
    emphasis_next_line: Regex,
    emphasis_same_line_closed: Regex,
    emphasis_next_line_closed: Regex,
    simple_line: Regex,
    generic: Regex,
    block_header: Regex,
}

impl KeywordPattern {
    pub fn new(keyword: &str) -> Option<Self> {
        let words: Vec<String> = keyword.split_whitespace().map(regex::escape).collect();
        if words.is_empty() {
            return None;
        }

        let fragment = format!("(?i:{})", words.join(r"[ \t]+"));
        let compiled = CompiledStrategies::new(&fragment)?;

        Some(Self {
            keyword: keyword.trim().to_string(),
            fragment,
            compiled,
        })
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }
}

impl CompiledStrategies {
    fn new(k: &str) -> Option<Self> {
        let e = EMPHASIS;
        // `**Keyword :**` or `**Keyword** :`, with the closer matching the opener.
        let closed = format!(
            r"(?:\*\*[ \t]*{k}[ \t]*(?::[ \t]*\*\*|\*\*[ \t]*:)|__[ \t]*{k}[ \t]*(?::[ \t]*__|__[ \t]*:))"
        );

        Some(Self {
            tabular_cell: compile(&format!(r"^[ \t]*{k}[ \t]*:[ \t]*(.*)$"))?,
            emphasis_same_line: compile(&format!(
                r"(?m){e}[ \t]*{k}[ \t]*:[ \t]*([^*_\s][^\n]*)"
            ))?,
            emphasis_next_line: compile(&format!(r"(?m){e}[ \t]*{k}[ \t]*:[ \t]*\n([^\n]*)"))?,
            emphasis_same_line_closed: compile(&format!(r"(?m){closed}[ \t]*([^\n]*)"))?,
            emphasis_next_line_closed: compile(&format!(r"(?m){closed}[ \t]*\n([^\n]*)"))?,
            simple_line: compile(&format!(r"(?m)^[ \t]*{k}[ \t]*:[ \t]*([^\n]*)$"))?,
            generic: compile(&format!(r"{k}[ \t]*:[ \t]*([^\n]*)"))?,
            block_header: compile(&format!(
                r"(?m){e}[ \t]*{k}[ \t]*(?::[ \t]*(?:{e})?|{e}[ \t]*:)[ \t]*"
            ))?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MatchStrategy {
    Tabular,
    EmphasisSameLine,
    EmphasisNextLine,
    EmphasisSameLineClosed,
    EmphasisNextLineClosed,
    SimpleLine,
    GenericFallback,
    MultiLineBlock,
}

impl MatchStrategy {
    /// Most specific first. A looser strategy only runs once every stricter one failed.
    pub const WATERFALL: [MatchStrategy; 8] = [
        MatchStrategy::Tabular,
        MatchStrategy::EmphasisSameLine,
        MatchStrategy::EmphasisNextLine,
        MatchStrategy::EmphasisSameLineClosed,
        MatchStrategy::EmphasisNextLineClosed,
        MatchStrategy::SimpleLine,
        MatchStrategy::GenericFallback,
        MatchStrategy::MultiLineBlock,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStrategy::Tabular => "tabular",
            MatchStrategy::EmphasisSameLine => "emphasis_same_line",
            MatchStrategy::EmphasisNextLine => "emphasis_next_line",
            MatchStrategy::EmphasisSameLineClosed => "emphasis_same_line_closed",
            MatchStrategy::EmphasisNextLineClosed => "emphasis_next_line_closed",
            MatchStrategy::SimpleLine => "simple_line",
            MatchStrategy::GenericFallback => "generic_fallback",
            MatchStrategy::MultiLineBlock => "multi_line_block",
        }
    }

    /// Returns the first non-empty, trimmed value this strategy finds for `keyword`.
    pub fn extract(&self, keyword: &KeywordPattern, text: &str) -> Option<String> {
        let compiled = &keyword.compiled;
        match self {
            MatchStrategy::Tabular => extract_tabular(&compiled.tabular_cell, text),
            MatchStrategy::GenericFallback => extract_generic(&compiled.generic, text),
            MatchStrategy::MultiLineBlock => extract_block(&compiled.block_header, text),
            MatchStrategy::EmphasisSameLine => {
                first_line_value(&compiled.emphasis_same_line, text, false)
            }
            MatchStrategy::EmphasisNextLine => {
                first_line_value(&compiled.emphasis_next_line, text, true)
            }
            MatchStrategy::EmphasisSameLineClosed => {
                first_line_value(&compiled.emphasis_same_line_closed, text, false)
            }
            MatchStrategy::EmphasisNextLineClosed => {
                first_line_value(&compiled.emphasis_next_line_closed, text, true)
            }
            MatchStrategy::SimpleLine => first_line_value(&compiled.simple_line, text, false),
        }
    }
}

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            debug!("Skipping keyword pattern that failed to compile: {}", e);
            None
        }
    }
}

/// Trims whitespace and stray `**` / unpaired `__` delimiters left around a value.
pub fn clean_value(raw: &str) -> Option<String> {
    let mut value = raw
        .trim()
        .trim_start_matches("**")
        .trim_end_matches("**")
        .trim();

    if value.matches("__").count() == 1 {
        value = value
            .trim_start_matches("__")
            .trim_end_matches("__")
            .trim();
    }

    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn first_line_value(regex: &Regex, text: &str, next_line: bool) -> Option<String> {
    regex
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|value| !(next_line && EMPHASIZED_LABEL.is_match(value)))
        .find_map(clean_value)
}

/// Line-scoped: a tab dump row is one line, so the value never crosses a newline.
fn extract_tabular(cell_pattern: &Regex, text: &str) -> Option<String> {
    for line in text.lines().filter(|line| line.contains('\t')) {
        let cells: Vec<&str> = line.split('\t').collect();

        for (index, cell) in cells.iter().enumerate() {
            let Some(captures) = cell_pattern.captures(cell) else {
                continue;
            };

            let mut parts = vec![captures.get(1).map_or("", |m| m.as_str()).trim()];
            for next in &cells[index + 1..] {
                if LABEL_CELL.is_match(next) {
                    break;
                }
                parts.push(next.trim());
            }

            let joined = parts
                .into_iter()
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" ");

            if let Some(value) = clean_value(&joined) {
                return Some(value);
            }
        }
    }

    None
}

/// Cuts `value` at the first whitespace run that opens a capitalised `Word(s) :` label.
fn cut_at_next_label(value: &str) -> &str {
    for (index, ch) in value.char_indices() {
        if index > 0 && (ch == ' ' || ch == '\t') && starts_with_label(&value[index..]) {
            return &value[..index];
        }
    }
    value
}

fn extract_generic(regex: &Regex, text: &str) -> Option<String> {
    regex
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| cut_at_next_label(m.as_str()))
        .find_map(clean_value)
}

fn extract_block(header: &Regex, text: &str) -> Option<String> {
    for found in header.find_iter(text) {
        let rest = &text[found.end()..];
        let end = EMPHASIZED_LABEL_LINE
            .find(rest)
            .map_or(rest.len(), |next| next.start());

        let block = BLANK_LINE_RUN.replace_all(&rest[..end], "\n\n");
        if let Some(value) = clean_value(&block) {
            return Some(value);
        }
    }

    None
}
