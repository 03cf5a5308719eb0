//! Error handling for the resume tailor

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeTailorError {
    #[error("Unsupported document format: {} (expected .pdf, .docx or .md)", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("Failed to read document '{}': {reason}", path.display())]
    DocumentRead { path: PathBuf, reason: String },

    #[error("Failed to load keyword corpus '{}': {reason}", path.display())]
    CorpusLoad { path: PathBuf, reason: String },

    #[error("Failed to write output '{}': {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("External tool '{tool}' failed: {message}")]
    ExternalTool { tool: String, message: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ResumeTailorError>;

impl ResumeTailorError {
    pub fn document_read(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        ResumeTailorError::DocumentRead {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn external_tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        ResumeTailorError::ExternalTool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Whether the workflow may carry on after this error.
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            ResumeTailorError::CorpusLoad { .. } | ResumeTailorError::ExternalTool { .. }
        )
    }
}
