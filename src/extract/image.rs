use std::io::Write;

use anyhow::{Context, Result};
use tokio::process::Command;

use super::{has_command, normalize_lines};

/// OCRs uploaded image bytes through tesseract. A missing tesseract binary
/// yields empty text rather than an error.
pub async fn extract_image_text(bytes: &[u8]) -> Result<String> {
    if !has_command("tesseract").await {
        tracing::warn!("tesseract not on PATH; image upload yields no text");
        return Ok(String::new());
    }

    let mut file = tempfile::NamedTempFile::new().context("failed creating temp image file")?;
    file.write_all(bytes).context("failed writing temp image file")?;

    let output = Command::new("tesseract")
        .arg(file.path())
        .arg("stdout")
        .arg("--dpi")
        .arg("300")
        .output()
        .await
        .context("failed to run tesseract")?;

    if !output.status.success() {
        return Ok(String::new());
    }

    Ok(normalize_lines(&String::from_utf8_lossy(&output.stdout)))
}
