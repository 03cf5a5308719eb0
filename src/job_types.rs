//! Job-type library: per-role job-description exports and resume templates
//!
//! ```text
//! <root>/<job_type>/keywords.csv
//! <root>/<job_type>/templates/<template>.md
//! ```

use crate::error::{Result, ResumeTailorError};
use log::debug;
use std::fs;
use std::path::PathBuf;

pub const KEYWORDS_FILE: &str = "keywords.csv";
pub const TEMPLATES_DIR: &str = "templates";
const TEMPLATE_EXTENSION: &str = "md";

/// Files resolved for one job type and template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobTypeAssets {
    pub job_type: String,
    pub template: PathBuf,
    pub keywords: PathBuf,
}

#[derive(Debug, Clone)]
pub struct JobTypeLibrary {
    root: PathBuf,
}

impl JobTypeLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Job type directory names, sorted. A missing root has none.
    pub fn job_types(&self) -> Vec<String> {
        let mut names: Vec<String> = match fs::read_dir(&self.root) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.path().is_dir())
                .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
                .collect(),
            Err(e) => {
                debug!("Cannot list {}: {}", self.root.display(), e);
                Vec::new()
            }
        };
        names.sort();
        names
    }

    /// Template names (file stems of `.md` files) of a job type, sorted.
    pub fn templates(&self, job_type: &str) -> Vec<String> {
        let dir = self.root.join(job_type).join(TEMPLATES_DIR);
        let Ok(entries) = fs::read_dir(&dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| ext.eq_ignore_ascii_case(TEMPLATE_EXTENSION))
                    .unwrap_or(false)
            })
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect();
        names.sort();
        names
    }

    /// Template and keyword export of `job_type`. Unknown names are
    /// `InvalidInput` errors listing what is available.
    pub fn resolve(&self, job_type: &str, template: &str) -> Result<JobTypeAssets> {
        let job_type = job_type.trim();
        let template = template.trim();
        validate_name("job type", job_type)?;
        validate_name("template", template)?;

        let dir = self.root.join(job_type);
        if !dir.is_dir() {
            return Err(ResumeTailorError::InvalidInput(format!(
                "Job type '{}' not found in {}. Available job types: {}",
                job_type,
                self.root.display(),
                listing(&self.job_types())
            )));
        }

        let template_path = dir
            .join(TEMPLATES_DIR)
            .join(format!("{}.{}", template, TEMPLATE_EXTENSION));
        if !template_path.is_file() {
            return Err(ResumeTailorError::InvalidInput(format!(
                "Template '{}' not found for job type '{}'. Available templates: {}",
                template,
                job_type,
                listing(&self.templates(job_type))
            )));
        }

        let keywords = dir.join(KEYWORDS_FILE);
        if !keywords.is_file() {
            return Err(ResumeTailorError::InvalidInput(format!(
                "Keywords file not found for job type '{}': {}",
                job_type,
                keywords.display()
            )));
        }

        Ok(JobTypeAssets {
            job_type: job_type.to_string(),
            template: template_path,
            keywords,
        })
    }
}

/// Names are single path components.
fn validate_name(kind: &str, name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\']);
    if valid {
        Ok(())
    } else {
        Err(ResumeTailorError::InvalidInput(format!("Invalid {} name '{}'", kind, name)))
    }
}

fn listing(names: &[String]) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> (tempfile::TempDir, JobTypeLibrary) {
        let dir = tempfile::tempdir().unwrap();
        let de = dir.path().join("data_engineer");
        fs::create_dir_all(de.join(TEMPLATES_DIR)).unwrap();
        fs::write(de.join(KEYWORDS_FILE), "high_priority_keywords,low_priority_keywords\n").unwrap();
        fs::write(de.join(TEMPLATES_DIR).join("general.md"), "Jane Doe\n").unwrap();
        fs::write(de.join(TEMPLATES_DIR).join("startup.MD"), "Jane Doe\n").unwrap();
        fs::write(de.join(TEMPLATES_DIR).join("notes.txt"), "x").unwrap();
        fs::create_dir_all(dir.path().join("analyst")).unwrap();
        fs::write(dir.path().join("README.md"), "x").unwrap();

        let library = JobTypeLibrary::new(dir.path());
        (dir, library)
    }

    #[test]
    fn test_listing() {
        let (_dir, library) = library();
        assert_eq!(library.job_types(), vec!["analyst", "data_engineer"]);
        assert_eq!(library.templates("data_engineer"), vec!["general", "startup"]);
        assert!(library.templates("analyst").is_empty());
        assert!(JobTypeLibrary::new("no/such/root").job_types().is_empty());
    }

    #[test]
    fn test_resolve() {
        let (dir, library) = library();
        let assets = library.resolve("data_engineer", "general").unwrap();
        assert_eq!(assets.job_type, "data_engineer");
        assert_eq!(
            assets.template,
            dir.path().join("data_engineer").join("templates").join("general.md")
        );
        assert_eq!(assets.keywords, dir.path().join("data_engineer").join("keywords.csv"));
    }

    #[test]
    fn test_unknown_job_type_lists_available() {
        let (_dir, library) = library();
        let err = library.resolve("designer", "general").unwrap_err();
        assert!(matches!(err, ResumeTailorError::InvalidInput(_)));
        assert!(err.to_string().contains("Available job types: analyst, data_engineer"));
    }

    #[test]
    fn test_unknown_template_lists_available() {
        let (_dir, library) = library();
        let err = library.resolve("data_engineer", "senior").unwrap_err();
        assert!(err.to_string().contains("Available templates: general, startup"));

        let err = library.resolve("analyst", "general").unwrap_err();
        assert!(err.to_string().contains("Available templates: none"));
    }

    #[test]
    fn test_missing_keywords_file() {
        let (dir, library) = library();
        let analyst = dir.path().join("analyst").join(TEMPLATES_DIR);
        fs::create_dir_all(&analyst).unwrap();
        fs::write(analyst.join("general.md"), "Jane Doe\n").unwrap();

        let err = library.resolve("analyst", "general").unwrap_err();
        assert!(err.to_string().contains("Keywords file not found"));
    }

    #[test]
    fn test_names_stay_inside_root() {
        let (_dir, library) = library();
        for name in ["..", "../data_engineer", "a/b", ""] {
            let err = library.resolve(name, "general").unwrap_err();
            assert!(err.to_string().contains("Invalid job type name"));
        }
        assert!(library.resolve("data_engineer", "../general").is_err());
    }
}
