use std::io::{Cursor, Read};

use anyhow::{Context, Result};
use roxmltree::Document;
use zip::ZipArchive;

use super::normalize_lines;

/// Extracts paragraph text from DOCX bytes. Paragraphs styled as headings are
/// emitted as `# Heading` lines so downstream category detection sees them.
pub fn extract_docx_text(bytes: &[u8]) -> Result<String> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).context("DOCX is not a valid ZIP archive")?;

    let mut document_xml = String::new();
    archive
        .by_name("word/document.xml")
        .context("DOCX missing word/document.xml")?
        .read_to_string(&mut document_xml)
        .context("failed to read word/document.xml")?;

    let doc = Document::parse(&document_xml).context("failed to parse DOCX XML")?;

    let mut lines = Vec::new();
    for paragraph in doc
        .descendants()
        .filter(|node| node.is_element() && node.tag_name().name() == "p")
    {
        let style = paragraph
            .descendants()
            .find(|node| node.is_element() && node.tag_name().name() == "pStyle")
            .and_then(|node| {
                node.attributes()
                    .find(|attr| attr.name().ends_with("val"))
                    .map(|attr| attr.value().to_string())
            });

        let text = paragraph
            .descendants()
            .filter(|node| node.is_element() && node.tag_name().name() == "t")
            .filter_map(|node| node.text())
            .collect::<Vec<_>>()
            .join("");

        let normalized = normalize_lines(&text);
        if normalized.is_empty() {
            continue;
        }

        let is_heading = style
            .as_ref()
            .map(|style| style.to_ascii_lowercase().contains("heading"))
            .unwrap_or(false);

        if is_heading {
            lines.push(format!("# {normalized}"));
        } else {
            lines.push(normalized);
        }
    }

    Ok(lines.join("\n"))
}
