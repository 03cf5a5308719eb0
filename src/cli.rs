//! CLI interface for the resume tailor

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-tailor")]
#[command(about = "Role-targeted resume restructuring and keyword coverage tool")]
#[command(long_about = "Parse a resume into sections, reorder them canonically, normalize capitalization and append the role keywords it does not mention yet")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a tailored resume for a role
    Generate {
        /// Path to resume file (PDF, DOCX, MD); without it a job type template is used
        #[arg(short, long, conflicts_with_all = ["job_type", "template"])]
        resume: Option<PathBuf>,

        /// Job type directory holding keywords.csv and templates/ (default from config)
        #[arg(short, long)]
        job_type: Option<String>,

        /// Template name within the job type (default from config)
        #[arg(short, long)]
        template: Option<String>,

        /// JSON structure to render instead of the parsed resume
        #[arg(short, long)]
        structure: Option<PathBuf>,

        /// Target role tag in the keyword corpus
        #[arg(long)]
        role: Option<String>,

        /// Keyword corpus CSV
        #[arg(short, long)]
        keywords: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Base name for output files ("John Doe" gives john_doe_resume.md)
        #[arg(short, long)]
        basename: Option<String>,

        /// Typeset the result to PDF
        #[arg(long)]
        pdf: bool,

        /// Upload the result to the configured destination
        #[arg(long)]
        upload: bool,

        /// Skip capitalization normalization
        #[arg(long)]
        no_formatting: bool,
    },

    /// Report keyword coverage of a resume
    Analyze {
        /// Path to resume file (PDF, DOCX, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Target role tag in the keyword corpus
        #[arg(long)]
        role: Option<String>,

        /// Keyword corpus CSV
        #[arg(short, long)]
        keywords: Option<PathBuf>,

        /// Output format: console, json
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file, or into a directory under a generated name
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Build a keyword corpus from a CSV of job descriptions
    Keywords {
        /// CSV with high_priority_keywords and low_priority_keywords columns
        #[arg(short, long)]
        input: PathBuf,

        /// Corpus CSV to write
        #[arg(short, long)]
        output: PathBuf,

        /// Role tag written on every row (default from config)
        #[arg(long)]
        role: Option<String>,
    },

    /// Print the parsed section structure as JSON
    Parse {
        /// Path to resume file (PDF, DOCX, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    format.parse()
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
