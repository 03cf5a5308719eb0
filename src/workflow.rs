//! End-to-end pipelines: generate a tailored resume, analyze keyword coverage

use crate::config::Config;
use crate::error::{Result, ResumeTailorError};
use crate::external::{Typesetter, UploadReceipt, Uploader};
use crate::input::{DocumentLoader, RawDocument};
use crate::job_types::JobTypeLibrary;
use crate::output::KeywordReport;
use crate::processing::{
    CorpusBuilder, CoverageAnalyzer, CoverageReport, KeywordCorpus, ResumeStructure, SectionParser,
    StructureRenderer, TOP_KEYWORDS,
};
use log::{info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const DEFAULT_OUTPUT_NAME: &str = "resume.md";

/// Corpus built from a job type's postings, written into the output directory.
pub const PROCESSED_CORPUS_NAME: &str = "processed_keywords.csv";

/// Inputs of one `generate` run. Unset fields fall back to configuration.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    pub resume: PathBuf,
    /// Pre-built structure (JSON) used instead of parsing the resume.
    pub structure: Option<PathBuf>,
    pub role: Option<String>,
    pub keywords: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub basename: Option<String>,
    pub apply_formatting: Option<bool>,
    /// Raises `corpus.min_weight` for this run.
    pub min_weight: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub output: PathBuf,
    pub text: String,
    pub structure: ResumeStructure,
    /// Coverage of the source resume before keyword injection.
    pub coverage: CoverageReport,
    pub artifact: Option<PathBuf>,
    pub upload: Option<UploadReceipt>,
    /// Soft failures that did not stop the run.
    pub warnings: Vec<String>,
}

pub struct Workflow<'c> {
    config: &'c Config,
    loader: DocumentLoader,
}

impl<'c> Workflow<'c> {
    pub fn new(config: &'c Config) -> Self {
        Self {
            config,
            loader: DocumentLoader::new(),
        }
    }

    /// Load a resume and split it into sections.
    pub fn parse(&mut self, resume: &Path) -> Result<(RawDocument, ResumeStructure)> {
        let document = self.loader.load(resume)?;
        let structure = SectionParser::new(self.config.parsing.clone()).parse(document.text());
        info!(
            "Parsed {} sections from {}",
            structure.len(),
            resume.display()
        );
        Ok((document, structure))
    }

    /// Corpus for `role` (or the configured default). Load failures yield an
    /// empty corpus.
    pub fn load_corpus(&self, keywords: Option<&Path>, role: Option<&str>) -> KeywordCorpus {
        let path = keywords.unwrap_or(&self.config.corpus.path);
        let role = role.unwrap_or(&self.config.corpus.default_role);
        KeywordCorpus::load_or_empty(path, role, &self.config.profile.special_terms)
            .with_min_weight(self.config.corpus.min_weight)
    }

    pub fn analyze(&mut self, resume: &Path, role: Option<&str>, keywords: Option<&Path>) -> Result<KeywordReport> {
        let (document, structure) = self.parse(resume)?;
        let corpus = self.load_corpus(keywords, role);
        let analyzer = CoverageAnalyzer::new(&corpus);
        let coverage = analyzer.analyze(document.text(), &structure);

        Ok(KeywordReport::new(
            resume,
            corpus.role(),
            corpus.len(),
            analyzer.scorable_count(),
            coverage,
        ))
    }

    /// Count the keywords of a job-description CSV and write them as a corpus
    /// tagged with `role`. Returns the most frequent high-priority keywords.
    pub fn build_corpus(&self, postings: &Path, output: &Path, role: &str) -> Result<Vec<String>> {
        let role = role.trim();
        if role.is_empty() {
            return Err(ResumeTailorError::InvalidInput("no role given for the corpus".to_string()));
        }

        let builder = CorpusBuilder::from_path(postings)?;
        write_atomic(output, &builder.to_csv(role)?)?;
        info!(
            "Corpus for '{}' from {} postings written to {}",
            role,
            builder.postings(),
            output.display()
        );
        Ok(builder.top_high(TOP_KEYWORDS))
    }

    /// Turn `base` into a request for a job type's template. The job type's
    /// postings are built into a corpus in the output directory first, and
    /// keywords seen in fewer than `job_types.min_count` postings are left out.
    pub fn job_type_request(
        &self,
        job_type: &str,
        template: Option<&str>,
        base: GenerateRequest,
    ) -> Result<GenerateRequest> {
        let settings = &self.config.job_types;
        let template = template.unwrap_or(&settings.default_template);
        let assets = JobTypeLibrary::new(&settings.root).resolve(job_type, template)?;
        info!(
            "Using template '{}' for job type '{}'",
            template, assets.job_type
        );

        let output_dir = base
            .output_dir
            .as_deref()
            .unwrap_or(&self.config.output.directory);
        let corpus = output_dir.join(PROCESSED_CORPUS_NAME);
        let top = self.build_corpus(&assets.keywords, &corpus, &assets.job_type)?;
        if !top.is_empty() {
            info!("Top keywords: {}", top.join(", "));
        }

        Ok(GenerateRequest {
            resume: assets.template,
            keywords: Some(corpus),
            role: Some(assets.job_type),
            min_weight: Some(settings.min_count),
            ..base
        })
    }

    /// Render the resume, write it atomically, then optionally typeset and
    /// upload. External tool failures are recorded as warnings; any other
    /// error is returned. Either way the written text stays in place.
    pub fn generate(
        &mut self,
        request: &GenerateRequest,
        typesetter: Option<&dyn Typesetter>,
        uploader: Option<&dyn Uploader>,
    ) -> Result<GenerationOutcome> {
        let (document, parsed) = self.parse(&request.resume)?;
        // An override replaces the parsed content, so coverage is scored on it.
        let (source_text, structure) = match &request.structure {
            Some(path) => {
                let structure = load_structure(path)?;
                (structure.text(), structure)
            }
            None => (document.text().to_string(), parsed),
        };

        let corpus = self.load_corpus(request.keywords.as_deref(), request.role.as_deref());
        let corpus = match request.min_weight {
            Some(min_weight) => corpus.with_min_weight(min_weight),
            None => corpus,
        };
        let coverage = CoverageAnalyzer::new(&corpus).analyze(&source_text, &structure);
        info!(
            "Source coverage {:.1}%, {} keywords missing",
            coverage.percentage,
            coverage.missing.len()
        );

        let apply_formatting = request
            .apply_formatting
            .unwrap_or(self.config.output.apply_formatting);
        let text = StructureRenderer::new(&self.config.profile).render(&structure, &corpus, apply_formatting);

        let output_dir = request
            .output_dir
            .as_deref()
            .unwrap_or(&self.config.output.directory);
        let output = output_dir.join(output_file_name(request.basename.as_deref()));
        write_atomic(&output, &text)?;
        info!("Resume written to {}", output.display());

        let mut warnings = Vec::new();

        let artifact = match typesetter.map(|typesetter| typesetter.render(&text, &output)) {
            Some(Ok(path)) => Some(path),
            Some(Err(e)) if e.is_soft() => {
                warn!("PDF generation failed: {}", e);
                warnings.push(e.to_string());
                None
            }
            Some(Err(e)) => return Err(e),
            None => None,
        };

        let target = artifact.as_deref().unwrap_or(&output);
        let upload = match uploader.map(|uploader| uploader.upload(target)) {
            Some(Ok(receipt)) => Some(receipt),
            Some(Err(e)) if e.is_soft() => {
                warn!("Upload failed: {}", e);
                warnings.push(e.to_string());
                None
            }
            Some(Err(e)) => return Err(e),
            None => None,
        };

        Ok(GenerationOutcome {
            output,
            text,
            structure,
            coverage,
            artifact,
            upload,
            warnings,
        })
    }
}

/// `"John Doe"` becomes `john_doe_resume.md`; no basename gives `resume.md`.
pub fn output_file_name(basename: Option<&str>) -> String {
    match basename.map(str::trim).filter(|b| !b.is_empty()) {
        Some(basename) => {
            let stem = basename
                .split_whitespace()
                .collect::<Vec<_>>()
                .join("_")
                .to_lowercase();
            format!("{}_{}", stem, DEFAULT_OUTPUT_NAME)
        }
        None => DEFAULT_OUTPUT_NAME.to_string(),
    }
}

/// Read a JSON structure dump (`[{"name": ..., "items": [...]}, ...]`).
pub fn load_structure(path: &Path) -> Result<ResumeStructure> {
    let content = std::fs::read_to_string(path).map_err(|e| ResumeTailorError::document_read(path, e))?;
    serde_json::from_str(&content).map_err(|e| ResumeTailorError::document_read(path, e))
}

/// Write `content` to `path` through a temporary file in the same directory,
/// so a failed write never leaves a partial file behind.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let write_error = |source: std::io::Error| ResumeTailorError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(write_error)?;

    let mut staged = NamedTempFile::new_in(dir).map_err(write_error)?;
    staged.write_all(content.as_bytes()).map_err(write_error)?;
    staged.as_file().sync_all().map_err(write_error)?;
    staged.persist(path).map_err(|e| write_error(e.error))?;
    Ok(())
}
