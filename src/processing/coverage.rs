//! Keyword coverage: which corpus keywords a resume mentions, overall and
//! per section

use crate::processing::corpus::{Keyword, KeywordCorpus};
use crate::processing::document::ResumeStructure;
use log::{debug, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Found/missing split of the scorable keywords of a corpus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coverage {
    /// Share of scorable keywords found, 0 to 100.
    pub percentage: f64,
    pub found: Vec<Keyword>,
    pub missing: Vec<Keyword>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionHits {
    pub section: String,
    pub count: usize,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub percentage: f64,
    pub found: Vec<Keyword>,
    pub missing: Vec<Keyword>,
    /// Sections with at least one hit, in structure order.
    pub distribution: Vec<SectionHits>,
}

impl CoverageReport {
    pub fn section(&self, name: &str) -> Option<&SectionHits> {
        self.distribution.iter().find(|hits| hits.section == name)
    }
}

/// Matches one corpus against texts. Patterns are compiled once per corpus.
pub struct CoverageAnalyzer<'a> {
    matchers: Vec<(&'a Keyword, Option<Regex>)>,
}

impl<'a> CoverageAnalyzer<'a> {
    pub fn new(corpus: &'a KeywordCorpus) -> Self {
        let matchers = corpus
            .scorable()
            .map(|keyword| (keyword, keyword_pattern(&keyword.text)))
            .collect();
        Self { matchers }
    }

    /// Number of keywords taking part in scoring.
    pub fn scorable_count(&self) -> usize {
        self.matchers.len()
    }

    /// Partition the scorable keywords into found and missing in `text`.
    pub fn compute_coverage(&self, text: &str) -> Coverage {
        if self.matchers.is_empty() {
            return Coverage::default();
        }

        let (found, missing): (Vec<_>, Vec<_>) = self
            .matchers
            .iter()
            .partition(|(_, pattern)| is_match(pattern.as_ref(), text));

        let percentage = found.len() as f64 / self.matchers.len() as f64 * 100.0;
        debug!(
            "Coverage {:.1}% ({} of {} keywords)",
            percentage,
            found.len(),
            self.matchers.len()
        );

        Coverage {
            percentage,
            found: found.into_iter().map(|(k, _)| (*k).clone()).collect(),
            missing: missing.into_iter().map(|(k, _)| (*k).clone()).collect(),
        }
    }

    /// Keyword hits per section. Sections without hits are left out.
    pub fn analyze_distribution(&self, structure: &ResumeStructure) -> Vec<SectionHits> {
        structure
            .sections()
            .iter()
            .filter_map(|section| {
                let text = section.joined();
                let mut keywords: Vec<String> = self
                    .matchers
                    .iter()
                    .filter(|(_, pattern)| is_match(pattern.as_ref(), &text))
                    .map(|(keyword, _)| keyword.text.clone())
                    .collect();

                if keywords.is_empty() {
                    return None;
                }

                keywords.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));
                keywords.dedup();

                Some(SectionHits {
                    section: section.name.clone(),
                    count: keywords.len(),
                    keywords,
                })
            })
            .collect()
    }

    /// Document-level coverage of `text` plus the per-section distribution
    /// of `structure`.
    pub fn analyze(&self, text: &str, structure: &ResumeStructure) -> CoverageReport {
        let coverage = self.compute_coverage(text);
        CoverageReport {
            percentage: coverage.percentage,
            found: coverage.found,
            missing: coverage.missing,
            distribution: self.analyze_distribution(structure),
        }
    }
}

/// Convenience wrapper for one-off coverage checks.
pub fn compute_coverage(text: &str, corpus: &KeywordCorpus) -> Coverage {
    CoverageAnalyzer::new(corpus).compute_coverage(text)
}

/// Convenience wrapper for one-off distribution checks.
pub fn analyze_distribution(structure: &ResumeStructure, corpus: &KeywordCorpus) -> Vec<SectionHits> {
    CoverageAnalyzer::new(corpus).analyze_distribution(structure)
}

/// Case-insensitive, word-bounded pattern for a literal term.
///
/// An edge of the term that is a word character gets `\b`; an edge that is
/// not (`c++`, `c#`, `.net`) gets `\B`, which holds exactly when the
/// neighbouring character is not a word character either. Both are zero-width
/// so the whole match is the term itself.
pub fn keyword_pattern(term: &str) -> Option<Regex> {
    let (first, last) = (term.chars().next()?, term.chars().next_back()?);
    let pattern = format!(
        r"(?i){}{}{}",
        edge_assertion(first),
        regex::escape(term),
        edge_assertion(last)
    );
    match Regex::new(&pattern) {
        Ok(pattern) => Some(pattern),
        Err(e) => {
            warn!("Cannot match keyword '{}': {}", term, e);
            None
        }
    }
}

/// Whether `term` occurs in `text` as a whole word, ignoring case.
pub fn contains_term(text: &str, term: &str) -> bool {
    is_match(keyword_pattern(term).as_ref(), text)
}

fn edge_assertion(c: char) -> &'static str {
    if c.is_alphanumeric() || c == '_' {
        r"\b"
    } else {
        r"\B"
    }
}

fn is_match(pattern: Option<&Regex>, text: &str) -> bool {
    pattern.map(|p| p.is_match(text)).unwrap_or(false)
}
