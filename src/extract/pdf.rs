use std::io::Write;

use anyhow::{Context, Result};
use tokio::process::Command;

use super::{has_command, normalize_lines};

/// Extracts text from PDF bytes: `pdftotext` when it is on PATH (better
/// layout fidelity), the pure-Rust `pdf_extract` crate otherwise.
pub async fn extract_pdf_text(bytes: &[u8]) -> Result<String> {
    if has_command("pdftotext").await {
        if let Some(text) = extract_with_pdftotext(bytes).await? {
            return Ok(text);
        }
    }

    let bytes = bytes.to_vec();
    let extracted =
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|_| anyhow::anyhow!("PDF extraction task panicked"))?
            .context("failed to extract text from PDF")?;

    Ok(normalize_lines(&extracted))
}

async fn extract_with_pdftotext(bytes: &[u8]) -> Result<Option<String>> {
    let mut file = tempfile::NamedTempFile::new().context("failed creating temp PDF file")?;
    file.write_all(bytes).context("failed writing temp PDF file")?;

    let output = Command::new("pdftotext")
        .arg("-layout")
        .arg("-nopgbrk")
        .arg(file.path())
        .arg("-")
        .output()
        .await
        .context("failed to run pdftotext")?;

    if !output.status.success() {
        return Ok(None);
    }

    let text = normalize_lines(&String::from_utf8_lossy(&output.stdout));
    if text.trim().is_empty() {
        return Ok(None);
    }

    Ok(Some(text))
}
