//! Keyword corpus: weighted, role-tagged keywords loaded from CSV

use crate::error::{Result, ResumeTailorError};
use crate::processing::profile::AliasTable;
use csv::{ReaderBuilder, Trim};
use log::{debug, info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Keywords shorter than this never take part in scoring.
pub const MIN_KEYWORD_CHARS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub text: String,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    #[serde(default)]
    pub roles: BTreeSet<String>,
}

impl Keyword {
    pub fn new(text: impl Into<String>, weight: f64) -> Self {
        Self {
            text: text.into().trim().to_string(),
            weight,
            canonical: None,
            roles: BTreeSet::new(),
        }
    }

    pub fn with_canonical(mut self, canonical: impl Into<String>) -> Self {
        self.canonical = Some(canonical.into());
        self
    }

    pub fn with_roles(mut self, roles: &str) -> Self {
        self.roles = split_roles(roles);
        self
    }

    /// Whether the keyword is long enough to be scored.
    pub fn is_scorable(&self) -> bool {
        self.text.chars().count() >= MIN_KEYWORD_CHARS
    }
}

#[derive(Debug, Deserialize)]
struct CorpusRow {
    #[serde(alias = "term")]
    keyword: String,
    #[serde(alias = "count")]
    weight: f64,
    #[serde(default, alias = "role", alias = "job_types")]
    roles: String,
}

/// Keywords for one role, highest weight first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordCorpus {
    role: Option<String>,
    keywords: Vec<Keyword>,
}

impl KeywordCorpus {
    /// Corpus over the given keywords, sorted by weight descending. Ties keep
    /// their input order.
    pub fn new(keywords: Vec<Keyword>) -> Self {
        let mut keywords = keywords;
        keywords.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        Self {
            role: None,
            keywords,
        }
    }

    pub fn empty(role: Option<&str>) -> Self {
        Self {
            role: role.map(str::to_string),
            keywords: Vec::new(),
        }
    }

    /// Load keywords tagged with `role` from a `keyword,weight,roles` CSV.
    pub fn load(path: &Path, role: &str, aliases: &AliasTable) -> Result<Self> {
        let corpus_error = |reason: String| ResumeTailorError::CorpusLoad {
            path: path.to_path_buf(),
            reason,
        };

        let role_matcher = RoleMatcher::new(role).map_err(corpus_error)?;

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .from_path(path)
            .map_err(|e| corpus_error(e.to_string()))?;

        let mut keywords = Vec::new();
        let mut total_rows = 0usize;
        for record in reader.deserialize::<CorpusRow>() {
            let row = record.map_err(|e| corpus_error(e.to_string()))?;
            total_rows += 1;

            if row.keyword.trim().is_empty() {
                debug!("Skipping corpus row {} with empty keyword", total_rows);
                continue;
            }
            if !role_matcher.matches(&row.roles) {
                continue;
            }

            let mut keyword = Keyword::new(row.keyword, row.weight).with_roles(&row.roles);
            keyword.canonical = aliases.canonical(&keyword.text).map(str::to_string);
            keywords.push(keyword);
        }

        let mut corpus = Self::new(keywords);
        corpus.role = Some(role.trim().to_string());

        info!(
            "Loaded {} of {} keywords for role '{}' from {}",
            corpus.len(),
            total_rows,
            role.trim(),
            path.display()
        );
        Ok(corpus)
    }

    /// Like [`KeywordCorpus::load`], but a missing or malformed source yields
    /// an empty corpus so generation can continue without keyword analysis.
    pub fn load_or_empty(path: &Path, role: &str, aliases: &AliasTable) -> Self {
        match Self::load(path, role, aliases) {
            Ok(corpus) => corpus,
            Err(e) => {
                warn!("{}; continuing without keyword analysis", e);
                Self::empty(Some(role.trim()))
            }
        }
    }

    /// Keep only keywords weighing at least `min_weight`.
    pub fn with_min_weight(mut self, min_weight: f64) -> Self {
        self.keywords.retain(|k| k.weight >= min_weight);
        self
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    pub fn keywords(&self) -> &[Keyword] {
        &self.keywords
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keyword> {
        self.keywords.iter()
    }

    /// Keywords that take part in scoring.
    pub fn scorable(&self) -> impl Iterator<Item = &Keyword> {
        self.keywords.iter().filter(|k| k.is_scorable())
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

/// Whole-word role tag matcher; `data_engineer` does not match
/// `data_engineering_lead`.
struct RoleMatcher {
    pattern: Regex,
}

impl RoleMatcher {
    fn new(role: &str) -> std::result::Result<Self, String> {
        let role = role.trim();
        if role.is_empty() {
            return Err("no target role given".to_string());
        }
        let pattern = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(role)))
            .map_err(|e| format!("invalid role '{}': {}", role, e))?;
        Ok(Self { pattern })
    }

    fn matches(&self, roles: &str) -> bool {
        self.pattern.is_match(roles)
    }
}

fn split_roles(roles: &str) -> BTreeSet<String> {
    roles
        .split(|c: char| c == ',' || c == ';' || c == '|' || c == '/' || c.is_whitespace())
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
