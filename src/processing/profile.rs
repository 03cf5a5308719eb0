//! Rendering profile: canonical section order, special-term aliases and
//! bullet-style sections. Passed explicitly to every component that needs it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lowercase term to canonical capitalized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct AliasTable {
    terms: BTreeMap<String, String>,
}

impl Default for AliasTable {
    fn default() -> Self {
        [
            ("aws", "AWS"),
            ("aws cloud", "AWS Cloud"),
            ("aws cloud devops", "AWS Cloud DevOps"),
            ("python", "Python"),
            ("sql", "SQL"),
            ("r", "R"),
            ("gcp", "GCP"),
            ("etl", "ETL"),
        ]
        .into_iter()
        .collect()
    }
}

impl<T: Into<String>, C: Into<String>> FromIterator<(T, C)> for AliasTable {
    fn from_iter<I: IntoIterator<Item = (T, C)>>(iter: I) -> Self {
        let mut table = AliasTable::empty();
        for (term, canonical) in iter {
            table.insert(term, canonical);
        }
        table
    }
}

impl From<BTreeMap<String, String>> for AliasTable {
    fn from(terms: BTreeMap<String, String>) -> Self {
        terms.into_iter().collect()
    }
}

impl From<AliasTable> for BTreeMap<String, String> {
    fn from(table: AliasTable) -> Self {
        table.terms
    }
}

impl AliasTable {
    pub fn empty() -> Self {
        Self {
            terms: BTreeMap::new(),
        }
    }

    /// Register an alias. Terms are stored lowercased and trimmed.
    pub fn insert(&mut self, term: impl Into<String>, canonical: impl Into<String>) {
        let term = term.into().trim().to_lowercase();
        if !term.is_empty() {
            self.terms.insert(term, canonical.into());
        }
    }

    pub fn canonical(&self, text: &str) -> Option<&str> {
        self.terms
            .get(&text.trim().to_lowercase())
            .map(String::as_str)
    }

    /// Entries with the longest term first, so multi-word aliases win over
    /// the single words inside them.
    pub fn longest_first(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .terms
            .iter()
            .map(|(term, canonical)| (term.as_str(), canonical.as_str()))
            .collect();
        entries.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));
        entries
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Preferred section sequence applied at render time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionOrder {
    names: Vec<String>,
}

impl Default for SectionOrder {
    fn default() -> Self {
        Self::new([
            "Header",
            "Professional Summary",
            "Technical Skills",
            "Professional Experience",
            "Projects Experience",
            "Education",
            "Certifications",
            "Keywords",
        ])
    }
}

impl SectionOrder {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Position of a section in the order, if ranked.
    pub fn rank(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

pub const DEFAULT_BULLET_SECTIONS: [&str; 4] = [
    "Professional Experience",
    "Projects Experience",
    "Technical Skills",
    "Certifications",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderProfile {
    pub canonical_order: SectionOrder,
    pub special_terms: AliasTable,
    /// Sections whose unprefixed items are rendered as `- ` bullets.
    pub bullet_sections: Vec<String>,
}

impl Default for RenderProfile {
    fn default() -> Self {
        Self {
            canonical_order: SectionOrder::default(),
            special_terms: AliasTable::default(),
            bullet_sections: DEFAULT_BULLET_SECTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl RenderProfile {
    pub fn is_bullet_section(&self, name: &str) -> bool {
        self.bullet_sections.iter().any(|s| s == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_lookup_is_case_insensitive() {
        let aliases = AliasTable::default();
        assert_eq!(aliases.canonical("AWS cloud"), Some("AWS Cloud"));
        assert_eq!(aliases.canonical(" Python "), Some("Python"));
        assert_eq!(aliases.canonical("rust"), None);
    }

    #[test]
    fn test_longest_first() {
        let aliases: AliasTable = [("r", "R"), ("aws cloud devops", "AWS Cloud DevOps"), ("aws", "AWS")]
            .into_iter()
            .collect();
        let terms: Vec<&str> = aliases.longest_first().into_iter().map(|(t, _)| t).collect();
        assert_eq!(terms, vec!["aws cloud devops", "aws", "r"]);
    }

    #[test]
    fn test_rank() {
        let order = SectionOrder::new(["Header", "Technical Skills", "Education"]);
        assert_eq!(order.rank("Header"), Some(0));
        assert_eq!(order.rank("Education"), Some(2));
        assert_eq!(order.rank("Volunteering"), None);
    }

    #[test]
    fn test_profile_from_partial_toml() {
        let profile: RenderProfile = toml::from_str(
            r#"
            canonical_order = ["Header", "Education"]

            [special_terms]
            k8s = "K8s"
            "#,
        )
        .unwrap();

        assert_eq!(profile.canonical_order.names().len(), 2);
        assert_eq!(profile.special_terms.canonical("K8S"), Some("K8s"));
        assert!(profile.is_bullet_section("Technical Skills"));
    }
}
