pub mod docx;
pub mod image;
pub mod pdf;

use std::path::Path;

use anyhow::Result;
use regex::Regex;
use tokio::process::Command;

/// Declared format of an uploaded document, derived from its filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    PlainText,
    Image,
}

impl DocumentFormat {
    pub fn from_filename(name: &str) -> Result<Self> {
        let extension = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            "txt" | "text" | "md" | "markdown" => Ok(DocumentFormat::PlainText),
            "png" | "jpg" | "jpeg" | "tiff" | "bmp" => Ok(DocumentFormat::Image),
            _ => anyhow::bail!("unsupported file format: {}", name),
        }
    }
}

/// Turns uploaded bytes into cleaned plain text. Page artifacts, banners and
/// boilerplate are dropped via the configured denylist of line-shape
/// patterns.
#[derive(Clone)]
pub struct Extractor {
    denylist: Vec<Regex>,
}

impl Extractor {
    pub fn new(patterns: &[String]) -> Self {
        let denylist = patterns
            .iter()
            .filter_map(|pattern| match Regex::new(pattern) {
                Ok(regex) => Some(regex),
                Err(err) => {
                    tracing::warn!(%pattern, %err, "skipping invalid strip pattern");
                    None
                }
            })
            .collect();

        Self { denylist }
    }

    pub async fn extract_text(&self, bytes: &[u8], format: DocumentFormat) -> Result<String> {
        let raw = match format {
            DocumentFormat::PlainText => String::from_utf8_lossy(bytes).to_string(),
            DocumentFormat::Pdf => pdf::extract_pdf_text(bytes).await?,
            DocumentFormat::Docx => {
                let bytes = bytes.to_vec();
                tokio::task::spawn_blocking(move || docx::extract_docx_text(&bytes))
                    .await
                    .map_err(|_| anyhow::anyhow!("DOCX extraction task panicked"))??
            }
            DocumentFormat::Image => image::extract_image_text(bytes).await?,
        };

        Ok(self.strip_artifacts(&raw))
    }

    fn strip_artifacts(&self, text: &str) -> String {
        text.lines()
            .filter(|line| !self.denylist.iter().any(|regex| regex.is_match(line)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub(crate) async fn has_command(binary: &str) -> bool {
    // Some binaries return non-zero for --version, so check PATH presence
    // via `which` instead of probing a specific flag.
    Command::new("which")
        .arg(binary)
        .output()
        .await
        .map(|out| out.status.success() && !out.stdout.is_empty())
        .unwrap_or(false)
}

/// Normalizes quotes and intra-line whitespace while keeping line structure
/// intact; the generation pipeline is line-oriented.
pub(crate) fn normalize_lines(input: &str) -> String {
    input
        .replace(['\u{2018}', '\u{2019}'], "'")
        .replace(['\u{201C}', '\u{201D}'], "\"")
        .replace('\u{00A0}', " ")
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_detection_from_extension() {
        assert_eq!(
            DocumentFormat::from_filename("notes.PDF").unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(
            DocumentFormat::from_filename("lecture.docx").unwrap(),
            DocumentFormat::Docx
        );
        assert_eq!(
            DocumentFormat::from_filename("slide.png").unwrap(),
            DocumentFormat::Image
        );
        assert!(DocumentFormat::from_filename("archive.tar.gz").is_err());
        assert!(DocumentFormat::from_filename("noextension").is_err());
    }

    #[test]
    fn denylist_strips_artifact_lines() {
        let extractor = Extractor::new(&crate::config::AppConfig::from_env().strip_patterns);
        let text = "Useful study content here.\n42\nPage 3 of 9\nCONFIDENTIAL\nMore content.";
        let cleaned = extractor.strip_artifacts(text);
        assert_eq!(cleaned, "Useful study content here.\nMore content.");
    }

    #[test]
    fn invalid_patterns_are_skipped_not_fatal() {
        let extractor = Extractor::new(&["[unclosed".to_string(), r"^\d+$".to_string()]);
        assert_eq!(extractor.strip_artifacts("keep\n123"), "keep");
    }

    #[test]
    fn normalization_keeps_line_boundaries() {
        let text = "first\u{00A0}line   here\nsecond \u{2018}line\u{2019}";
        assert_eq!(normalize_lines(text), "first line here\nsecond 'line'");
    }

    #[tokio::test]
    async fn plain_text_passes_through_cleaning() {
        let extractor = Extractor::new(&[r"^\d+$".to_string()]);
        let out = extractor
            .extract_text(b"content line\n7\nanother line", DocumentFormat::PlainText)
            .await
            .unwrap();
        assert_eq!(out, "content line\nanother line");
    }
}
