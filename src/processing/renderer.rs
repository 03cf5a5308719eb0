//! Structure renderer: canonical ordering, serialization, capitalization
//! normalization and keyword injection

use crate::processing::corpus::{Keyword, KeywordCorpus};
use crate::processing::coverage::{keyword_pattern, CoverageAnalyzer};
use crate::processing::document::{ResumeStructure, Section, HEADER, KEYWORDS};
use crate::processing::parser::bullet_text;
use crate::processing::profile::RenderProfile;
use log::{debug, info};
use regex::Captures;
use std::collections::HashSet;

#[derive(Debug, Clone)]
struct Block {
    name: String,
    title: String,
    lines: Vec<String>,
}

impl Block {
    fn is_header(&self) -> bool {
        self.name == HEADER
    }

    fn is_keywords(&self) -> bool {
        self.name == KEYWORDS
    }
}

pub struct StructureRenderer<'p> {
    profile: &'p RenderProfile,
}

impl<'p> StructureRenderer<'p> {
    pub fn new(profile: &'p RenderProfile) -> Self {
        Self { profile }
    }

    /// Sections ranked by the canonical order; unranked sections follow in
    /// their original relative order.
    pub fn order_sections<'s>(&self, structure: &'s ResumeStructure) -> Vec<&'s Section> {
        let order = &self.profile.canonical_order;
        let mut sections: Vec<&Section> = structure.sections().iter().collect();
        sections.sort_by_key(|section| order.rank(&section.name).unwrap_or(usize::MAX));
        sections
    }

    /// Render a structure to canonical text, injecting corpus keywords the
    /// content does not mention yet.
    pub fn render(&self, structure: &ResumeStructure, corpus: &KeywordCorpus, apply_formatting: bool) -> String {
        let mut blocks: Vec<Block> = self
            .order_sections(structure)
            .into_iter()
            .filter(|section| !section.is_empty())
            .map(|section| self.block(section))
            .collect();

        if apply_formatting {
            for block in &mut blocks {
                block.title = self.normalize_capitalization(&block.title);
                for line in &mut block.lines {
                    *line = self.normalize_capitalization(line);
                }
            }
        }

        let draft = serialize(&blocks);
        let missing = CoverageAnalyzer::new(corpus).compute_coverage(&draft).missing;
        let additions = dedupe_sorted(missing.iter().map(|k| self.format_keyword(k)).collect());
        debug!("{} keywords to inject", additions.len());

        match blocks.iter_mut().find(|block| block.is_keywords()) {
            Some(block) => {
                let existing = keyword_entries(&block.lines);
                let merged = merge_keyword_lists(&existing, &additions);
                if !merged.is_empty() {
                    block.lines = vec![self.keyword_line(&merged, apply_formatting)];
                }
            }
            None if !additions.is_empty() => {
                info!("Appending Keywords section with {} entries", additions.len());
                blocks.push(Block {
                    name: KEYWORDS.to_string(),
                    title: KEYWORDS.to_string(),
                    lines: vec![self.keyword_line(&additions, apply_formatting)],
                });
            }
            None => {}
        }

        serialize(&blocks)
    }

    /// Replace whole-word alias matches with their canonical form and escape
    /// standalone ampersands for the typesetting pipeline.
    pub fn normalize_capitalization(&self, text: &str) -> String {
        let mut normalized = text.to_string();

        for (term, canonical) in self.profile.special_terms.longest_first() {
            let Some(pattern) = keyword_pattern(term) else {
                continue;
            };
            normalized = pattern
                .replace_all(&normalized, |caps: &Captures| {
                    let matched = &caps[0];
                    if matched.to_lowercase() == term {
                        canonical.to_string()
                    } else {
                        matched.to_string()
                    }
                })
                .into_owned();
        }

        normalized.replace(" & ", " \\& ")
    }

    /// Display form of an injected keyword: canonical alias, else title case
    /// for all-lowercase text, else unchanged.
    pub fn format_keyword(&self, keyword: &Keyword) -> String {
        if let Some(canonical) = &keyword.canonical {
            return canonical.clone();
        }
        if let Some(canonical) = self.profile.special_terms.canonical(&keyword.text) {
            return canonical.to_string();
        }
        if keyword.text == keyword.text.to_lowercase() {
            title_case(&keyword.text)
        } else {
            keyword.text.clone()
        }
    }

    fn block(&self, section: &Section) -> Block {
        let bulleted = self.profile.is_bullet_section(&section.name);
        let lines = section
            .items
            .iter()
            .map(|item| {
                let prefixed = item.trim_start().starts_with(['-', '*']);
                if prefixed || !bulleted {
                    item.clone()
                } else {
                    format!("- {}", item)
                }
            })
            .collect();

        Block {
            name: section.name.clone(),
            title: section.name.clone(),
            lines,
        }
    }

    fn keyword_line(&self, entries: &[String], apply_formatting: bool) -> String {
        let line = entries.join(", ");
        if apply_formatting {
            self.normalize_capitalization(&line)
        } else {
            line
        }
    }
}

fn serialize(blocks: &[Block]) -> String {
    let mut lines: Vec<String> = Vec::new();

    for block in blocks.iter().filter(|b| !b.lines.is_empty()) {
        if block.is_header() {
            lines.extend(block.lines.iter().cloned());
            continue;
        }

        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format!("## {}", block.title));
        if block.is_keywords() {
            lines.push(String::new());
        }
        lines.extend(block.lines.iter().cloned());
    }

    if lines.is_empty() {
        return String::new();
    }
    let mut output = lines.join("\n");
    output.push('\n');
    output
}

/// Comma-separated entries of a Keywords section, bullet markers removed.
pub fn keyword_entries(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .flat_map(|item| item.lines())
        .flat_map(|line| bullet_text(line).unwrap_or(line).split(','))
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Union of two keyword lists, deduplicated and sorted ignoring case. On a
/// case-insensitive clash the entry from `existing` wins.
pub fn merge_keyword_lists(existing: &[String], additions: &[String]) -> Vec<String> {
    dedupe_sorted(existing.iter().chain(additions).cloned().collect())
}

fn dedupe_sorted(entries: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut unique: Vec<String> = entries
        .into_iter()
        .filter(|entry| seen.insert(entry.to_lowercase()))
        .collect();
    unique.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));
    unique
}

/// Upper-case the first letter of every alphabetic run.
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            result.push(c);
            in_word = false;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::parser::SectionParser;
    use crate::processing::profile::{AliasTable, SectionOrder};

    fn structure(sections: Vec<Section>) -> ResumeStructure {
        sections.into_iter().collect()
    }

    fn corpus(entries: &[(&str, f64)]) -> KeywordCorpus {
        KeywordCorpus::new(entries.iter().map(|(t, w)| Keyword::new(*t, *w)).collect())
    }

    #[test]
    fn test_canonical_order() {
        let profile = RenderProfile {
            canonical_order: SectionOrder::new(["Header", "Technical Skills", "Professional Experience", "Education"]),
            ..RenderProfile::default()
        };
        let renderer = StructureRenderer::new(&profile);
        let resume = structure(vec![
            Section::with_items("Education", ["BSc Physics"]),
            Section::with_items(HEADER, ["Jane Doe"]),
            Section::with_items("Technical Skills", ["Rust"]),
        ]);

        let names: Vec<&str> = renderer
            .order_sections(&resume)
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec![HEADER, "Technical Skills", "Education"]);

        let text = renderer.render(&resume, &KeywordCorpus::default(), false);
        assert_eq!(text, "Jane Doe\n\n## Technical Skills\n- Rust\n\n## Education\nBSc Physics\n");
    }

    #[test]
    fn test_unranked_sections_keep_relative_order() {
        let profile = RenderProfile {
            canonical_order: SectionOrder::new(["Header", "Education"]),
            ..RenderProfile::default()
        };
        let resume = structure(vec![
            Section::with_items("Volunteering", ["Food bank"]),
            Section::with_items(HEADER, ["Jane"]),
            Section::with_items("Awards", ["Hackathon"]),
            Section::with_items("Education", ["BSc"]),
        ]);

        let names: Vec<String> = StructureRenderer::new(&profile)
            .order_sections(&resume)
            .iter()
            .map(|s| s.name.clone())
            .collect();
        assert_eq!(names, vec!["Header", "Education", "Volunteering", "Awards"]);
    }

    #[test]
    fn test_bullet_prefixing() {
        let profile = RenderProfile::default();
        let resume = structure(vec![
            Section::with_items("Technical Skills", ["Python", "* Spark", "- dbt"]),
            Section::with_items("Education", ["BSc Mathematics"]),
        ]);

        let text = StructureRenderer::new(&profile).render(&resume, &KeywordCorpus::default(), false);
        assert_eq!(
            text,
            "## Technical Skills\n- Python\n* Spark\n- dbt\n\n## Education\nBSc Mathematics\n"
        );
    }

    #[test]
    fn test_alias_does_not_touch_larger_words() {
        let profile = RenderProfile {
            special_terms: [("r", "R")].into_iter().collect(),
            ..RenderProfile::default()
        };
        let renderer = StructureRenderer::new(&profile);
        assert_eq!(
            renderer.normalize_capitalization("Director of analytics, fluent in r and Rust"),
            "Director of analytics, fluent in R and Rust"
        );
    }

    #[test]
    fn test_longer_aliases_apply_first() {
        let profile = RenderProfile::default();
        let renderer = StructureRenderer::new(&profile);
        assert_eq!(
            renderer.normalize_capitalization("aws cloud devops and Aws Cloud & gcp/etl"),
            "AWS Cloud DevOps and AWS Cloud \\& GCP/ETL"
        );
    }

    #[test]
    fn test_ampersand_only_escaped_when_formatting() {
        let profile = RenderProfile::default();
        let renderer = StructureRenderer::new(&profile);
        let resume = structure(vec![Section::with_items("Education", ["Physics & Maths"])]);

        let plain = renderer.render(&resume, &KeywordCorpus::default(), false);
        assert!(plain.contains("Physics & Maths"));
        let formatted = renderer.render(&resume, &KeywordCorpus::default(), true);
        assert!(formatted.contains("Physics \\& Maths"));
    }

    #[test]
    fn test_keywords_merge_in_place() {
        let profile = RenderProfile::default();
        let resume = SectionParser::default().parse("## Keywords\n\nAWS, SQL");

        let text = StructureRenderer::new(&profile).render(&resume, &corpus(&[("gcp", 1.0)]), true);
        assert_eq!(text, "## Keywords\n\nAWS, GCP, SQL\n");
    }

    #[test]
    fn test_keywords_appended_at_end() {
        let profile = RenderProfile {
            canonical_order: SectionOrder::new(["Header"]),
            ..RenderProfile::default()
        };
        let resume = structure(vec![
            Section::with_items(HEADER, ["Jane Doe"]),
            Section::with_items("Technical Skills", ["Python"]),
        ]);
        let corpus = corpus(&[("python", 10.0), ("kafka", 3.0), ("sql", 5.0)]);

        let text = StructureRenderer::new(&profile).render(&resume, &corpus, true);
        assert_eq!(
            text,
            "Jane Doe\n\n## Technical Skills\n- Python\n\n## Keywords\n\nKafka, SQL\n"
        );
    }

    #[test]
    fn test_no_keywords_section_without_missing_keywords() {
        let profile = RenderProfile::default();
        let resume = structure(vec![Section::with_items("Technical Skills", ["Python"])]);

        let text = StructureRenderer::new(&profile).render(&resume, &corpus(&[("python", 1.0)]), true);
        assert!(!text.contains("## Keywords"));
    }

    #[test]
    fn test_symbol_keywords_present_in_resume_are_not_suggested() {
        let profile = RenderProfile::default();
        let resume = structure(vec![Section::with_items("Technical Skills", ["C++", "C#", ".NET"])]);
        let corpus = corpus(&[("c++", 3.0), ("c#", 2.0), (".net", 1.0)]);

        let text = StructureRenderer::new(&profile).render(&resume, &corpus, true);
        assert_eq!(text, "## Technical Skills\n- C++\n- C#\n- .NET\n");
    }

    #[test]
    fn test_render_is_idempotent() {
        let profile = RenderProfile::default();
        let parser = SectionParser::default();
        let renderer = StructureRenderer::new(&profile);

        let resume = parser.parse(
            "Jane Doe\njane@example.com\n\n\
             ## Professional Experience\n\
             - Built ETL pipelines in python & spark\n\
             - Tuned sql queries\n\n\
             ## Technical Skills\n- aws\n- Airflow\n- C++\n",
        );
        let corpus = corpus(&[
            ("python", 10.0),
            ("sql", 9.0),
            ("kafka", 8.0),
            ("aws cloud services", 7.0),
            ("c++", 6.0),
            ("dbt", 5.0),
            ("Machine Learning", 4.0),
        ]);

        let first = renderer.render(&resume, &corpus, true);
        assert!(first.ends_with("## Keywords\n\nAWS Cloud Services, Dbt, Kafka, Machine Learning\n"));
        assert!(first.starts_with("Jane Doe\njane@example.com\n\n## Technical Skills\n- AWS\n"));

        let second = renderer.render(&parser.parse(&first), &corpus, true);
        assert_eq!(second, first);
    }

    #[test]
    fn test_existing_bulleted_keywords_are_merged() {
        let profile = RenderProfile::default();
        let resume = structure(vec![Section::with_items(KEYWORDS, ["- Snowflake, dbt", "* Looker"])]);

        let text = StructureRenderer::new(&profile).render(&resume, &corpus(&[("DBT", 2.0), ("kafka", 1.0)]), false);
        assert_eq!(text, "## Keywords\n\ndbt, Kafka, Looker, Snowflake\n");
    }

    #[test]
    fn test_format_keyword() {
        let profile = RenderProfile {
            special_terms: AliasTable::default(),
            ..RenderProfile::default()
        };
        let renderer = StructureRenderer::new(&profile);

        assert_eq!(renderer.format_keyword(&Keyword::new("gcp", 1.0)), "GCP");
        assert_eq!(renderer.format_keyword(&Keyword::new("dbt", 1.0).with_canonical("dbt")), "dbt");
        assert_eq!(renderer.format_keyword(&Keyword::new("data modeling", 1.0)), "Data Modeling");
        assert_eq!(renderer.format_keyword(&Keyword::new("PySpark", 1.0)), "PySpark");
    }

    #[test]
    fn test_merge_keyword_lists() {
        let existing = vec!["AWS".to_string(), "sql".to_string()];
        let additions = vec!["SQL".to_string(), "Airflow".to_string()];
        assert_eq!(merge_keyword_lists(&existing, &additions), vec!["Airflow", "AWS", "sql"]);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("node.js"), "Node.Js");
        assert_eq!(title_case("3d modeling"), "3D Modeling");
        assert_eq!(title_case("c++"), "C++");
    }
}
