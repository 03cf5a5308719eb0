//! Corpus building: keyword counts harvested from job-description exports
//!
//! The input is a CSV with `high_priority_keywords` and
//! `low_priority_keywords` columns, one job posting per row. The output is a
//! `keyword,count,priority,roles` CSV that [`KeywordCorpus::load`] reads back
//! with `count` as the weight.
//!
//! [`KeywordCorpus::load`]: crate::processing::KeywordCorpus::load

use crate::error::{Result, ResumeTailorError};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Number of high-priority keywords reported after a build.
pub const TOP_KEYWORDS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: usize,
    pub priority: Priority,
}

#[derive(Debug, Deserialize)]
struct PostingRow {
    #[serde(default)]
    high_priority_keywords: Option<String>,
    #[serde(default)]
    low_priority_keywords: Option<String>,
}

#[derive(Serialize)]
struct CorpusRecord<'a> {
    keyword: &'a str,
    count: usize,
    priority: Priority,
    roles: &'a str,
}

/// Per-priority keyword counts over any number of postings.
#[derive(Debug, Clone, Default)]
pub struct CorpusBuilder {
    high: HashMap<String, usize>,
    low: HashMap<String, usize>,
    postings: usize,
}

impl CorpusBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count keywords from every posting in a job-description CSV.
    pub fn from_path(path: &Path) -> Result<Self> {
        let corpus_error = |reason: String| ResumeTailorError::CorpusLoad {
            path: path.to_path_buf(),
            reason,
        };

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .from_path(path)
            .map_err(|e| corpus_error(e.to_string()))?;

        let mut builder = Self::new();
        for record in reader.deserialize::<PostingRow>() {
            let row = record.map_err(|e| corpus_error(e.to_string()))?;
            builder.add_posting(
                row.high_priority_keywords.as_deref(),
                row.low_priority_keywords.as_deref(),
            );
        }

        if builder.high.is_empty() && builder.low.is_empty() {
            warn!("No keywords found in {}", path.display());
        }
        info!(
            "Counted {} high and {} low priority keywords over {} postings from {}",
            builder.high.len(),
            builder.low.len(),
            builder.postings,
            path.display()
        );
        Ok(builder)
    }

    pub fn add_posting(&mut self, high: Option<&str>, low: Option<&str>) {
        self.postings += 1;
        for keyword in high.map(extract_keywords).unwrap_or_default() {
            *self.high.entry(keyword).or_default() += 1;
        }
        for keyword in low.map(extract_keywords).unwrap_or_default() {
            *self.low.entry(keyword).or_default() += 1;
        }
    }

    pub fn postings(&self) -> usize {
        self.postings
    }

    /// High-priority keywords by count, then low-priority ones. A keyword
    /// counted under both priorities is listed once, as high.
    pub fn entries(&self) -> Vec<KeywordCount> {
        let mut entries = ranked(&self.high, Priority::High);
        let low = ranked(&self.low, Priority::Low)
            .into_iter()
            .filter(|entry| !self.high.contains_key(&entry.keyword));
        entries.extend(low);
        entries
    }

    /// The `limit` most frequent high-priority keywords.
    pub fn top_high(&self, limit: usize) -> Vec<String> {
        ranked(&self.high, Priority::High)
            .into_iter()
            .take(limit)
            .map(|entry| entry.keyword)
            .collect()
    }

    /// Corpus CSV with every row tagged for `role`.
    pub fn to_csv(&self, role: &str) -> Result<String> {
        let mut writer = WriterBuilder::new().from_writer(Vec::new());
        for entry in self.entries() {
            writer
                .serialize(CorpusRecord {
                    keyword: &entry.keyword,
                    count: entry.count,
                    priority: entry.priority,
                    roles: role,
                })
                .map_err(std::io::Error::from)?;
        }
        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        String::from_utf8(bytes).map_err(|e| ResumeTailorError::InvalidInput(e.to_string()))
    }
}

fn ranked(counts: &HashMap<String, usize>, priority: Priority) -> Vec<KeywordCount> {
    let mut entries: Vec<KeywordCount> = counts
        .iter()
        .map(|(keyword, count)| KeywordCount {
            keyword: keyword.clone(),
            count: *count,
            priority,
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.keyword.cmp(&b.keyword)));
    entries
}

/// Lowercased words of a keyword cell with punctuation treated as spaces,
/// followed by the whole cell as one phrase when it has several words.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' || c.is_whitespace() { c } else { ' ' })
        .collect();

    let mut keywords: Vec<String> = cleaned.split_whitespace().map(str::to_string).collect();
    if keywords.len() > 1 {
        let phrase = keywords.join(" ");
        debug!("Keeping phrase '{}'", phrase);
        keywords.push(phrase);
    }
    keywords
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn postings_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_extract_keywords() {
        assert_eq!(extract_keywords("Python"), vec!["python"]);
        assert_eq!(
            extract_keywords("Apache Spark, SQL"),
            vec!["apache", "spark", "sql", "apache spark sql"]
        );
        assert_eq!(extract_keywords("CI/CD"), vec!["ci", "cd", "ci cd"]);
        assert!(extract_keywords("  ,; ").is_empty());
    }

    #[test]
    fn test_counts_ranked_by_priority() {
        let mut builder = CorpusBuilder::new();
        builder.add_posting(Some("python"), Some("looker"));
        builder.add_posting(Some("Python"), Some("tableau"));
        builder.add_posting(Some("kafka"), Some("Looker, python"));
        builder.add_posting(None, None);

        assert_eq!(builder.postings(), 4);
        let entries = builder.entries();
        let summary: Vec<(&str, usize, Priority)> = entries
            .iter()
            .map(|e| (e.keyword.as_str(), e.count, e.priority))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("python", 2, Priority::High),
                ("kafka", 1, Priority::High),
                ("looker", 2, Priority::Low),
                ("looker python", 1, Priority::Low),
                ("tableau", 1, Priority::Low),
            ]
        );
        assert_eq!(builder.top_high(1), vec!["python"]);
    }

    #[test]
    fn test_csv_round_trip_through_corpus() {
        let file = postings_file(
            "title,high_priority_keywords,low_priority_keywords\n\
             DE,\"python, sql\",looker\n\
             DE II,python,\n\
             Analyst,,looker\n",
        );
        let builder = CorpusBuilder::from_path(file.path()).unwrap();
        let csv = builder.to_csv("data_engineer").unwrap();

        assert!(csv.starts_with("keyword,count,priority,roles\npython,2,high,data_engineer\n"));
        assert!(csv.ends_with("looker,2,low,data_engineer\n"));

        let corpus_file = postings_file(&csv);
        let corpus = crate::processing::KeywordCorpus::load(
            corpus_file.path(),
            "data_engineer",
            &crate::processing::AliasTable::default(),
        )
        .unwrap();
        assert_eq!(corpus.keywords()[0].text, "python");
        assert_eq!(corpus.len(), 4);
    }

    #[test]
    fn test_missing_postings_file_is_corpus_error() {
        let err = CorpusBuilder::from_path(Path::new("no/such/postings.csv")).unwrap_err();
        assert!(matches!(err, ResumeTailorError::CorpusLoad { .. }));
    }
}
