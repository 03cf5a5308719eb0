//! Coverage reports: metadata plus formatters for console and JSON output

use crate::config::OutputFormat;
use crate::error::{Result, ResumeTailorError};
use crate::processing::{CoverageReport, Keyword};
use chrono::{DateTime, Utc};
use colored::{Color, Colorize};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Coverage results for one resume against one role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordReport {
    pub metadata: ReportMetadata,
    pub coverage: CoverageReport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub resume: PathBuf,
    pub role: Option<String>,
    /// Keywords in the corpus after weight filtering.
    pub corpus_size: usize,
    /// Keywords long enough to take part in scoring.
    pub scorable_keywords: usize,
}

impl KeywordReport {
    pub fn new(resume: &Path, role: Option<&str>, corpus_size: usize, scorable_keywords: usize, coverage: CoverageReport) -> Self {
        Self {
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                resume: resume.to_path_buf(),
                role: role.map(str::to_string),
                corpus_size,
                scorable_keywords,
            },
            coverage,
        }
    }
}

pub trait ReportFormatter {
    fn format_report(&self, report: &KeywordReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

pub struct ConsoleFormatter {
    use_colors: bool,
    /// Number of missing keywords listed before truncating.
    missing_limit: usize,
}

pub struct JsonFormatter {
    pretty: bool,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self {
            use_colors,
            missing_limit: 25,
        }
    }

    pub fn with_missing_limit(mut self, limit: usize) -> Self {
        self.missing_limit = limit;
        self
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str) -> String {
        if self.use_colors {
            format!("\n{}\n", title.color(Color::Blue).bold())
        } else {
            format!("\n{}\n", title)
        }
    }

    fn coverage_color(percentage: f64) -> Color {
        match percentage {
            p if p >= 75.0 => Color::Green,
            p if p >= 50.0 => Color::Yellow,
            _ => Color::Red,
        }
    }

    fn keyword_list(keywords: &[Keyword], limit: usize) -> String {
        let mut listed: Vec<String> = keywords
            .iter()
            .take(limit)
            .map(|k| format!("{} ({})", k.text, k.weight))
            .collect();
        if keywords.len() > limit {
            listed.push(format!("... and {} more", keywords.len() - limit));
        }
        listed.join(", ")
    }
}

impl ReportFormatter for ConsoleFormatter {
    fn format_report(&self, report: &KeywordReport) -> Result<String> {
        let coverage = &report.coverage;
        let metadata = &report.metadata;
        let mut output = String::new();

        output.push_str(&self.format_header("KEYWORD COVERAGE"));
        output.push_str(&format!(
            "Resume: {}\nRole: {}\nGenerated: {}\n",
            metadata.resume.display(),
            metadata.role.as_deref().unwrap_or("-"),
            metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        if metadata.scorable_keywords == 0 {
            output.push_str(&format!(
                "\n{}\n",
                self.colorize("No keywords available for this role", Color::Yellow)
            ));
            return Ok(output);
        }

        let percentage = format!("{:.1}%", coverage.percentage);
        output.push_str(&format!(
            "\nCoverage: {} ({} of {} keywords)\n",
            self.colorize(&percentage, Self::coverage_color(coverage.percentage)),
            coverage.found.len(),
            metadata.scorable_keywords
        ));

        if !coverage.found.is_empty() {
            output.push_str(&self.format_header("Found"));
            output.push_str(&Self::keyword_list(&coverage.found, usize::MAX));
            output.push('\n');
        }

        if !coverage.missing.is_empty() {
            output.push_str(&self.format_header("Missing"));
            output.push_str(&self.colorize(
                &Self::keyword_list(&coverage.missing, self.missing_limit),
                Color::Red,
            ));
            output.push('\n');
        }

        if !coverage.distribution.is_empty() {
            output.push_str(&self.format_header("By section"));
            for hits in &coverage.distribution {
                output.push_str(&format!(
                    "  {} [{}]: {}\n",
                    self.colorize(&hits.section, Color::Cyan),
                    hits.count,
                    hits.keywords.join(", ")
                ));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl ReportFormatter for JsonFormatter {
    fn format_report(&self, report: &KeywordReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, true)
    }

    pub fn with_options(use_colors: bool, pretty_json: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors),
            json_formatter: JsonFormatter::new(pretty_json),
        }
    }

    /// Cap on missing keywords listed by the console report.
    pub fn with_missing_limit(self, limit: usize) -> Self {
        Self {
            console_formatter: self.console_formatter.with_missing_limit(limit),
            ..self
        }
    }

    pub fn generate_report(&self, report: &KeywordReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    let write_error = |source| ResumeTailorError::OutputWrite {
        path: file_path.to_path_buf(),
        source,
    };
    if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    std::fs::write(file_path, content).map_err(write_error)?;
    Ok(())
}

/// Where a report asked to be saved at `save` goes: into a timestamped file
/// named after the resume when `save` is a directory, else `save` itself.
pub fn resolve_report_path(save: &Path, format: &OutputFormat, resume: &Path) -> PathBuf {
    if save.is_dir() {
        save.join(suggest_filename(format, resume, true))
    } else {
        save.to_path_buf()
    }
}

pub fn suggest_filename(format: &OutputFormat, resume: &Path, timestamp: bool) -> String {
    let base_name = resume
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "resume".to_string());

    let timestamp_suffix = if timestamp {
        format!("_{}", Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_coverage{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_coverage{}.json", base_name, timestamp_suffix),
    }
}
