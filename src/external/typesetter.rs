//! Typesetting of the final resume text into a PDF artifact

use crate::config::TypesettingConfig;
use crate::error::{Result, ResumeTailorError};
use log::{debug, info, warn};
use shell_words::split as shell_split;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Environment variable overriding the configured typesetting command.
pub const TYPESETTER_ENV: &str = "RESUME_TAILOR_TYPESETTER";

pub trait Typesetter {
    /// Typeset `text`, written earlier to `source`, into an artifact placed
    /// next to it. Returns the artifact path.
    fn render(&self, text: &str, source: &Path) -> Result<PathBuf>;
}

/// Runs an external converter as `<command> <input> -o <output.pdf> --pdf-engine=<engine>`.
#[derive(Debug, Clone)]
pub struct CommandTypesetter {
    command: Vec<String>,
    pdf_engine: String,
    header_block: String,
    extra_args: Vec<String>,
}

impl CommandTypesetter {
    pub fn new(command: Vec<String>, pdf_engine: impl Into<String>) -> Self {
        Self {
            command,
            pdf_engine: pdf_engine.into(),
            header_block: String::new(),
            extra_args: Vec::new(),
        }
    }

    /// Build from configuration, letting [`TYPESETTER_ENV`] override the command.
    pub fn from_config(config: &TypesettingConfig) -> Result<Self> {
        let env_value = std::env::var(TYPESETTER_ENV).ok();
        let command = resolve_command(env_value.as_deref(), &config.command)?;
        Ok(Self::new(command, config.pdf_engine.clone())
            .with_header_block(config.header_block.clone())
            .with_extra_args(config.extra_args.clone()))
    }

    pub fn with_header_block(mut self, header_block: impl Into<String>) -> Self {
        self.header_block = header_block.into();
        self
    }

    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    pub fn program(&self) -> &str {
        self.command.first().map(String::as_str).unwrap_or_default()
    }

    /// The text handed to the converter: front matter replaced by the header block.
    pub fn prepare(&self, text: &str) -> String {
        let body = strip_front_matter(text);
        let header = self.header_block.trim();
        if header.is_empty() {
            body.to_string()
        } else {
            format!("{}\n\n{}", header, body)
        }
    }

    fn run(&self, input: &Path, output: &Path) -> Result<()> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| ResumeTailorError::external_tool("typesetter", "no command configured"))?;

        let mut command = Command::new(program);
        command
            .args(args)
            .arg(input)
            .arg("-o")
            .arg(output)
            .arg(format!("--pdf-engine={}", self.pdf_engine))
            .args(&self.extra_args);
        debug!("Running {:?}", command);

        let result = command
            .output()
            .map_err(|e| ResumeTailorError::external_tool(program.as_str(), e.to_string()))?;
        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(ResumeTailorError::external_tool(
                program.as_str(),
                format!("{} ({})", stderr.trim(), result.status),
            ));
        }
        Ok(())
    }
}

impl Typesetter for CommandTypesetter {
    fn render(&self, text: &str, source: &Path) -> Result<PathBuf> {
        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ResumeTailorError::InvalidInput(format!("no file name in {}", source.display())))?;
        let dir = source.parent().unwrap_or_else(|| Path::new("."));
        let staging = dir.join(format!("{}_typeset.md", stem));
        let output = dir.join(format!("{}.pdf", stem));

        std::fs::write(&staging, self.prepare(text)).map_err(|source| ResumeTailorError::OutputWrite {
            path: staging.clone(),
            source,
        })?;

        let result = self.run(&staging, &output);
        if let Err(e) = std::fs::remove_file(&staging) {
            warn!("Could not remove {}: {}", staging.display(), e);
        }
        result?;

        info!("PDF generated by {}: {}", self.program(), output.display());
        Ok(output)
    }
}

/// Command words from the override value when it is usable, else from the
/// configured command line.
pub fn resolve_command(override_value: Option<&str>, configured: &str) -> Result<Vec<String>> {
    if let Some(value) = override_value.filter(|v| !v.trim().is_empty()) {
        match shell_split(value) {
            Ok(parts) if !parts.is_empty() => return Ok(parts),
            Ok(_) => {}
            Err(e) => warn!("Ignoring {}='{}': {}", TYPESETTER_ENV, value, e),
        }
    }

    let parts = shell_split(configured)
        .map_err(|e| ResumeTailorError::Configuration(format!("typesetting.command: {}", e)))?;
    if parts.is_empty() {
        return Err(ResumeTailorError::Configuration(
            "typesetting.command is empty".to_string(),
        ));
    }
    Ok(parts)
}

/// Text without a leading `---` delimited YAML block.
pub fn strip_front_matter(text: &str) -> &str {
    let trimmed = text.trim_start();
    let Some(rest) = trimmed.strip_prefix("---") else {
        return text;
    };
    if !rest.starts_with('\n') && !rest.starts_with("\r\n") {
        return text;
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        offset += line.len();
        if line.trim_end() == "---" {
            return rest[offset..].trim_start_matches(['\r', '\n']);
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_front_matter() {
        let text = "---\ngeometry: margin=1in\n---\n\nJane Doe\n## Skills\n";
        assert_eq!(strip_front_matter(text), "Jane Doe\n## Skills\n");
        assert_eq!(strip_front_matter("Jane Doe\n---\n"), "Jane Doe\n---\n");
        assert_eq!(strip_front_matter("---\nunterminated"), "---\nunterminated");
        assert_eq!(strip_front_matter("----\nx\n---\n"), "----\nx\n---\n");
    }

    #[test]
    fn test_prepare_replaces_front_matter() {
        let typesetter = CommandTypesetter::new(vec!["pandoc".into()], "pdflatex")
            .with_header_block("---\ngeometry: margin=0.5in\n---\n");
        let prepared = typesetter.prepare("---\nold: true\n---\nJane Doe\n");
        assert_eq!(prepared, "---\ngeometry: margin=0.5in\n---\n\nJane Doe\n");
    }

    #[test]
    fn test_resolve_command() {
        assert_eq!(resolve_command(None, "pandoc").unwrap(), vec!["pandoc"]);
        assert_eq!(
            resolve_command(Some("docker run --rm 'pandoc/latex'"), "pandoc").unwrap(),
            vec!["docker", "run", "--rm", "pandoc/latex"]
        );
        assert_eq!(resolve_command(Some("   "), "pandoc").unwrap(), vec!["pandoc"]);
        assert_eq!(resolve_command(Some("'unbalanced"), "pandoc").unwrap(), vec!["pandoc"]);
        assert!(resolve_command(None, "  ").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_render_runs_command_and_cleans_staging() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("jane_doe_resume.md");
        std::fs::write(&source, "Jane Doe\n").unwrap();

        // $1 = input, $2 = -o, $3 = output
        let command = vec!["sh".into(), "-c".into(), r#"cp "$1" "$3""#.into(), "typeset".into()];
        let typesetter = CommandTypesetter::new(command, "pdflatex").with_header_block("% header");

        let artifact = typesetter.render("Jane Doe\n", &source).unwrap();
        assert_eq!(artifact, dir.path().join("jane_doe_resume.pdf"));
        assert_eq!(std::fs::read_to_string(&artifact).unwrap(), "% header\n\nJane Doe\n");
        assert!(!dir.path().join("jane_doe_resume_typeset.md").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_extra_args_follow_engine() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("cv.md");

        // $4 = --pdf-engine=..., $5 = first extra argument
        let command = vec!["sh".into(), "-c".into(), r#"printf '%s %s' "$4" "$5" > "$3""#.into(), "typeset".into()];
        let typesetter = CommandTypesetter::new(command, "xelatex").with_extra_args(vec!["--toc".into()]);
        assert_eq!(typesetter.program(), "sh");

        let artifact = typesetter.render("Jane Doe\n", &source).unwrap();
        assert_eq!(std::fs::read_to_string(&artifact).unwrap(), "--pdf-engine=xelatex --toc");
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command_is_external_tool_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("cv.md");

        let typesetter = CommandTypesetter::new(vec!["false".into()], "pdflatex");
        let err = typesetter.render("text", &source).unwrap_err();
        assert!(matches!(err, ResumeTailorError::ExternalTool { .. }));
        assert!(err.is_soft());
        assert!(!dir.path().join("cv_typeset.md").exists());
    }

    #[test]
    fn test_missing_program_is_external_tool_error() {
        let dir = tempfile::tempdir().unwrap();
        let typesetter = CommandTypesetter::new(vec!["resume-tailor-no-such-program".into()], "pdflatex");
        let err = typesetter.render("text", &dir.path().join("cv.md")).unwrap_err();
        assert!(err.to_string().contains("resume-tailor-no-such-program"));
    }
}
