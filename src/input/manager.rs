//! Document loader dispatching on the inferred format

use crate::error::{Result, ResumeTailorError};
use crate::input::file_detector::DocumentFormat;
use crate::input::text_extractor::{DocxExtractor, MarkdownExtractor, PdfExtractor, TextExtractor};
use log::info;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Raw text of a loaded document. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawDocument {
    path: PathBuf,
    format: DocumentFormat,
    text: String,
}

impl RawDocument {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

pub struct DocumentLoader {
    cache: HashMap<PathBuf, RawDocument>,
    enable_cache: bool,
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentLoader {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub fn load(&mut self, path: &Path) -> Result<RawDocument> {
        if self.enable_cache {
            if let Some(cached) = self.cache.get(path) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached.clone());
            }
        }

        // Format is decided before touching the filesystem.
        let format = DocumentFormat::from_path(path).ok_or_else(|| {
            ResumeTailorError::UnsupportedFormat {
                path: path.to_path_buf(),
            }
        })?;

        let text = match format {
            DocumentFormat::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path)?
            }
            DocumentFormat::Docx => {
                info!("Extracting text from DOCX: {}", path.display());
                DocxExtractor.extract(path)?
            }
            DocumentFormat::Markdown => {
                info!("Reading markdown file: {}", path.display());
                MarkdownExtractor.extract(path)?
            }
        };

        let document = RawDocument {
            path: path.to_path_buf(),
            format,
            text,
        };

        if self.enable_cache {
            self.cache.insert(path.to_path_buf(), document.clone());
        }

        Ok(document)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
