//! Section parser: splits raw resume text into named sections of items
//!
//! The parser walks the text line by line with two states. Before the first
//! `## ` heading everything belongs to the reserved `Header` section; after
//! it, lines accumulate into the span of the current heading. When a span
//! closes, [`ParsePolicy`] decides which of its lines survive as items.

use crate::processing::document::{ResumeStructure, HEADER, KEYWORDS};
use log::debug;
use serde::{Deserialize, Serialize};

/// Rules applied when a heading span is turned into items.
///
/// The defaults are bullet-oriented: a span holding any bullet keeps only its
/// bullets, and a named span without bullets is dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsePolicy {
    /// Drop non-bullet lines from a span that contains at least one bullet.
    pub discard_prose_in_bullet_spans: bool,
    /// Drop a named section whose span contains no bullets at all.
    pub drop_prose_only_sections: bool,
    /// Sections whose bullet-free span is always kept as one paragraph.
    pub paragraph_sections: Vec<String>,
    /// Append the content of a repeated heading to the first occurrence.
    /// When off, the last occurrence replaces the earlier items.
    pub merge_duplicate_headings: bool,
}

impl Default for ParsePolicy {
    fn default() -> Self {
        Self {
            discard_prose_in_bullet_spans: true,
            drop_prose_only_sections: true,
            paragraph_sections: vec![KEYWORDS.to_string()],
            merge_duplicate_headings: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum ParseState {
    InHeader,
    InSection(String),
}

impl ParseState {
    fn section_name(&self) -> &str {
        match self {
            ParseState::InHeader => HEADER,
            ParseState::InSection(name) => name,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SectionParser {
    policy: ParsePolicy,
}

impl SectionParser {
    pub fn new(policy: ParsePolicy) -> Self {
        Self { policy }
    }

    /// Parse raw text into a structure. Never fails; text without headings
    /// yields a Header-only structure and empty text an empty one.
    pub fn parse(&self, text: &str) -> ResumeStructure {
        let mut structure = ResumeStructure::new();
        let mut seen = Vec::new();
        let mut state = ParseState::InHeader;
        let mut span: Vec<&str> = Vec::new();

        for line in text.lines() {
            match heading_name(line) {
                Some(name) => {
                    self.close_span(&state, &span, &mut structure, &mut seen);
                    span.clear();
                    state = ParseState::InSection(name.to_string());
                }
                None => span.push(line),
            }
        }
        self.close_span(&state, &span, &mut structure, &mut seen);

        structure.prune_empty();
        debug!("Parsed {} sections", structure.len());
        structure
    }

    fn close_span(
        &self,
        state: &ParseState,
        span: &[&str],
        structure: &mut ResumeStructure,
        seen: &mut Vec<String>,
    ) {
        let name = state.section_name();
        let items = self.span_items(name, span);

        let repeated = seen.iter().any(|s| s == name);
        if repeated && !self.policy.merge_duplicate_headings {
            structure.entry_or_insert(name).items = items;
        } else {
            structure.entry_or_insert(name).items.extend(items);
        }

        if !repeated {
            seen.push(name.to_string());
        }
    }

    fn span_items(&self, name: &str, span: &[&str]) -> Vec<String> {
        let has_bullets = span.iter().any(|line| bullet_text(line).is_some());

        if has_bullets {
            return span
                .iter()
                .filter_map(|line| match bullet_text(line) {
                    Some(text) => Some(text),
                    None if self.policy.discard_prose_in_bullet_spans => None,
                    None => Some(line.trim()),
                })
                .filter(|text| !text.is_empty())
                .map(str::to_string)
                .collect();
        }

        let paragraph = span.join("\n");
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            return Vec::new();
        }

        if self.keeps_paragraph(name) {
            vec![paragraph.to_string()]
        } else {
            debug!("Dropping section '{}': no bullet items", name);
            Vec::new()
        }
    }

    fn keeps_paragraph(&self, name: &str) -> bool {
        name == HEADER
            || !self.policy.drop_prose_only_sections
            || self
                .policy
                .paragraph_sections
                .iter()
                .any(|s| s.eq_ignore_ascii_case(name))
    }
}

/// Name of a `## <name>` heading line.
pub fn heading_name(line: &str) -> Option<&str> {
    let rest = line.trim().strip_prefix("##")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let name = rest.trim();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Text of a `-` or `*` bullet line with the marker removed.
pub fn bullet_text(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('*'))
        .map(str::trim)
}
