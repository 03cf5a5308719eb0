//! Text extraction from various file formats

use crate::error::{Result, ResumeTailorError};
use log::{debug, warn};
use std::fs;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const DOCX_BODY: &str = "word/document.xml";

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> Result<String>;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).map_err(|e| ResumeTailorError::document_read(path, e))?;

        let document = lopdf::Document::load_mem(&bytes).map_err(|e| {
            ResumeTailorError::document_read(path, format!("invalid PDF: {}", e))
        })?;

        let pages = document.get_pages();
        debug!("PDF '{}' has {} pages", path.display(), pages.len());

        let mut text = String::new();
        for page_number in pages.keys() {
            match document.extract_text(&[*page_number]) {
                Ok(page_text) => text.push_str(&page_text),
                Err(e) => {
                    // A broken page must not sink the rest of the document.
                    warn!(
                        "Skipping page {} of '{}': {}",
                        page_number,
                        path.display(),
                        e
                    );
                }
            }
        }

        Ok(text)
    }
}

pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn extract(&self, path: &Path) -> Result<String> {
        let file = fs::File::open(path).map_err(|e| ResumeTailorError::document_read(path, e))?;

        let mut archive = ZipArchive::new(file).map_err(|e| {
            ResumeTailorError::document_read(path, format!("invalid DOCX container: {}", e))
        })?;

        let mut xml = String::new();
        archive
            .by_name(DOCX_BODY)
            .map_err(|e| ResumeTailorError::document_read(path, format!("{}: {}", DOCX_BODY, e)))?
            .read_to_string(&mut xml)
            .map_err(|e| ResumeTailorError::document_read(path, e))?;

        let paragraphs = docx_paragraphs(&xml)
            .map_err(|e| ResumeTailorError::document_read(path, format!("malformed {}: {}", DOCX_BODY, e)))?;

        Ok(paragraphs.join("\n"))
    }
}

/// Paragraph texts of a WordprocessingML body, in document order.
pub fn docx_paragraphs(xml: &str) -> std::result::Result<Vec<String>, roxmltree::Error> {
    let doc = roxmltree::Document::parse(xml)?;

    let paragraphs = doc
        .descendants()
        .filter(|node| node.has_tag_name((W_NS, "p")))
        .map(|paragraph| {
            let mut text = String::new();
            for node in paragraph.descendants() {
                if node.has_tag_name((W_NS, "t")) {
                    text.push_str(node.text().unwrap_or(""));
                } else if node.has_tag_name((W_NS, "tab")) {
                    text.push('\t');
                } else if node.has_tag_name((W_NS, "br")) {
                    text.push('\n');
                }
            }
            text
        })
        .collect();

    Ok(paragraphs)
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    fn extract(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| ResumeTailorError::document_read(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(paragraphs: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="{}"><w:body>{}</w:body></w:document>"#,
            W_NS, paragraphs
        )
    }

    #[test]
    fn test_docx_paragraphs_in_order() {
        let xml = body(
            "<w:p><w:r><w:t>## Technical Skills</w:t></w:r></w:p>\
             <w:p><w:r><w:t>- Py</w:t></w:r><w:r><w:t>thon</w:t></w:r></w:p>\
             <w:p/>\
             <w:p><w:r><w:t>SQL</w:t><w:tab/><w:t>dbt</w:t></w:r></w:p>",
        );

        let paragraphs = docx_paragraphs(&xml).unwrap();
        assert_eq!(
            paragraphs,
            vec!["## Technical Skills", "- Python", "", "SQL\tdbt"]
        );
    }

    #[test]
    fn test_docx_malformed_xml() {
        assert!(docx_paragraphs("<w:document><w:body>").is_err());
    }

    #[test]
    fn test_markdown_is_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.md");
        let content = "Jane Doe\n\n## Technical Skills\n- **Rust** & Go  \n";
        std::fs::write(&path, content).unwrap();

        assert_eq!(MarkdownExtractor.extract(&path).unwrap(), content);
    }

    #[test]
    fn test_pdf_garbage_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.pdf");
        std::fs::write(&path, b"definitely not a pdf").unwrap();

        let err = PdfExtractor.extract(&path).unwrap_err();
        assert!(matches!(err, ResumeTailorError::DocumentRead { .. }));
        assert!(err.to_string().contains("resume.pdf"));
    }
}
