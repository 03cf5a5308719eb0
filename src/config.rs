//! Configuration management for the resume tailor

use crate::error::{Result, ResumeTailorError};
use crate::processing::{ParsePolicy, RenderProfile};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub profile: RenderProfile,
    pub parsing: ParsePolicy,
    pub corpus: CorpusConfig,
    pub job_types: JobTypesConfig,
    pub output: OutputConfig,
    pub typesetting: TypesettingConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    pub path: PathBuf,
    pub default_role: String,
    /// Keywords weighing less than this are ignored.
    pub min_weight: f64,
}

/// Layout used by `generate --job-type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobTypesConfig {
    pub root: PathBuf,
    pub default_job_type: String,
    pub default_template: String,
    /// Keywords seen in fewer postings than this are not suggested.
    pub min_count: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub apply_formatting: bool,
    pub format: OutputFormat,
    pub color_output: bool,
    /// Missing keywords listed by the console report before truncating.
    pub missing_limit: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypesettingConfig {
    /// Command line of the converter; `RESUME_TAILOR_TYPESETTER` overrides it.
    pub command: String,
    pub pdf_engine: String,
    /// Prepended to the text in place of any existing front matter.
    pub header_block: String,
    pub extra_args: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub destination: Option<PathBuf>,
}

pub const DEFAULT_HEADER_BLOCK: &str = r"---
geometry: margin=0.5in
output: pdf_document
header-includes:
  - \usepackage{fancyhdr}
  - \pagestyle{empty}
  - \pagenumbering{gobble}
  - \usepackage{hyperref}
  - \hypersetup{colorlinks=true, linkcolor=blue, urlcolor=blue}
---
";

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("keywords_db.csv"),
            default_role: "data_engineer".to_string(),
            min_weight: 0.0,
        }
    }
}

impl Default for JobTypesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("job_types"),
            default_job_type: "data_engineer".to_string(),
            default_template: "general".to_string(),
            min_count: 2.0,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("data").join("output"),
            apply_formatting: true,
            format: OutputFormat::Console,
            color_output: true,
            missing_limit: 25,
        }
    }
}

impl Default for TypesettingConfig {
    fn default() -> Self {
        Self {
            command: "pandoc".to_string(),
            pdf_engine: "pdflatex".to_string(),
            header_block: DEFAULT_HEADER_BLOCK.to_string(),
            extra_args: Vec::new(),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(format: &str) -> std::result::Result<Self, Self::Err> {
        match format.to_lowercase().as_str() {
            "console" => Ok(OutputFormat::Console),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid output format: {}. Supported: console, json", format)),
        }
    }
}

impl Config {
    /// Load from `path`, or the default location when `None`. A missing file
    /// is created with defaults.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);

        if config_path.exists() {
            debug!("Loading configuration from {}", config_path.display());
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content).map_err(|e| {
                ResumeTailorError::Configuration(format!(
                    "Failed to parse {}: {}",
                    config_path.display(),
                    e
                ))
            })?;
            Ok(config)
        } else {
            info!("Writing default configuration to {}", config_path.display());
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            ResumeTailorError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-tailor")
            .join("config.toml")
    }

    pub fn upload_destination(&self) -> Option<&Path> {
        self.upload.destination.as_deref()
    }
}
