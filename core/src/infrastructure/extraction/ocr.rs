use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tokio::process::Command;
use tracing::{error, info, instrument, warn};

use crate::domain::common::entities::app_errors::CoreError;

/// Resolution pdftoppm renders scanned pages at before OCR.
pub const RENDER_DPI: u32 = 300;

/// Runs the tesseract binary on an image and returns what it printed.
#[instrument(skip(bin, languages), fields(path = %path.display()))]
pub async fn recognize(bin: &str, languages: &str, path: &Path) -> Result<String, CoreError> {
    let output = Command::new(bin)
        .arg(path)
        .arg("stdout")
        .arg("-l")
        .arg(languages)
        .output()
        .await
        .map_err(|e| {
            error!("Failed to start {}: {}", bin, e);
            CoreError::ExtractionError(format!("OCR engine unavailable: {e}"))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        error!("OCR exited with {}: {}", output.status, stderr.trim());
        return Err(CoreError::ExtractionError(
            "OCR could not read the document".to_string(),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Page number pdftoppm encoded in `page-07.png`.
fn page_number(path: &Path) -> Option<u32> {
    path.file_stem()?
        .to_str()?
        .rsplit('-')
        .next()?
        .parse()
        .ok()
}

/// Renders every page of `pdf` into `out_dir` as PNG and returns them in page order.
#[instrument(skip(bin, out_dir), fields(pdf = %pdf.display()))]
pub async fn render_pdf_pages(
    bin: &str,
    pdf: &Path,
    dpi: u32,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, CoreError> {
    let output = Command::new(bin)
        .arg("-png")
        .arg("-r")
        .arg(dpi.to_string())
        .arg(pdf)
        .arg(out_dir.join("page"))
        .output()
        .await
        .map_err(|e| {
            error!("Failed to start {}: {}", bin, e);
            CoreError::ExtractionError(format!("PDF renderer unavailable: {e}"))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        error!("pdftoppm exited with {}: {}", output.status, stderr.trim());
        return Err(CoreError::ExtractionError(
            "Failed to render PDF pages".to_string(),
        ));
    }

    let mut entries = tokio::fs::read_dir(out_dir)
        .await
        .map_err(|e| CoreError::ExtractionError(format!("Failed to list rendered pages: {e}")))?;

    let mut pages = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| CoreError::ExtractionError(format!("Failed to list rendered pages: {e}")))?
    {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "png") {
            if let Some(number) = page_number(&path) {
                pages.push((number, path));
            }
        }
    }
    pages.sort_by_key(|(number, _)| *number);

    Ok(pages.into_iter().map(|(_, path)| path).collect())
}

/// Rasterizes a scanned PDF and runs OCR on each page image.
///
/// Pages tesseract fails on are skipped. An error is returned only when no
/// page could be rendered or none produced text.
pub async fn recognize_pdf(
    tesseract_bin: &str,
    pdftoppm_bin: &str,
    languages: &str,
    pdf: &Path,
) -> Result<String, CoreError> {
    let workdir = TempDir::new()
        .map_err(|e| CoreError::ExtractionError(format!("Failed to create work dir: {e}")))?;

    let pages = render_pdf_pages(pdftoppm_bin, pdf, RENDER_DPI, workdir.path()).await?;
    if pages.is_empty() {
        return Err(CoreError::ExtractionError(
            "PDF rendered no pages".to_string(),
        ));
    }
    info!(pages = pages.len(), "running OCR on rendered pages");

    let mut text = String::new();
    for (index, page) in pages.iter().enumerate() {
        match recognize(tesseract_bin, languages, page).await {
            Ok(page_text) if !page_text.is_empty() => {
                text.push_str(&page_text);
                text.push('\n');
            }
            Ok(_) => {}
            Err(e) => warn!("OCR failed on page {}: {}", index + 1, e),
        }
    }

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(CoreError::ExtractionError(
            "OCR could not read the document".to_string(),
        ));
    }

    Ok(text)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Writes an executable shell script standing in for an external tool.
    #[cfg(unix)]
    pub(crate) fn fake_tool(dir: &Path, name: &str, script: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.display().to_string()
    }

    /// pdftoppm stand-in: writes two pages next to the output prefix (its last argument).
    #[cfg(unix)]
    pub(crate) const FAKE_PDFTOPPM: &str =
        r#"for last in "$@"; do :; done; touch "$last-2.png" "$last-1.png""#;

    /// tesseract stand-in: prints the name of the file it was asked to read.
    #[cfg(unix)]
    pub(crate) const FAKE_TESSERACT: &str = r#"echo "read $(basename "$1")""#;

    #[tokio::test]
    async fn test_missing_binary_is_extraction_error() {
        let result = recognize(
            "pearl-no-such-ocr-binary",
            "eng",
            Path::new("/tmp/nothing.png"),
        )
        .await;

        assert!(matches!(result, Err(CoreError::ExtractionError(_))));
    }

    #[test]
    fn test_page_number() {
        assert_eq!(page_number(Path::new("/tmp/x/page-1.png")), Some(1));
        assert_eq!(page_number(Path::new("/tmp/x/page-012.png")), Some(12));
        assert_eq!(page_number(Path::new("/tmp/x/cover.png")), None);
    }

    #[tokio::test]
    async fn test_missing_renderer_is_extraction_error() {
        let result = recognize_pdf(
            "pearl-no-such-ocr-binary",
            "pearl-no-such-pdftoppm",
            "eng",
            Path::new("/tmp/scan.pdf"),
        )
        .await;

        assert!(matches!(result, Err(CoreError::ExtractionError(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_rendered_pages_are_read_in_order() {
        let tools = TempDir::new().unwrap();
        let pdftoppm = fake_tool(tools.path(), "pdftoppm", FAKE_PDFTOPPM);
        let tesseract = fake_tool(tools.path(), "tesseract", FAKE_TESSERACT);

        let text = recognize_pdf(&tesseract, &pdftoppm, "eng", Path::new("/tmp/scan.pdf"))
            .await
            .unwrap();

        assert_eq!(text, "read page-1.png\nread page-2.png");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_no_rendered_pages_is_error() {
        let tools = TempDir::new().unwrap();
        let pdftoppm = fake_tool(tools.path(), "pdftoppm", "exit 0");
        let tesseract = fake_tool(tools.path(), "tesseract", FAKE_TESSERACT);

        let result = recognize_pdf(&tesseract, &pdftoppm, "eng", Path::new("/tmp/scan.pdf")).await;

        assert!(matches!(result, Err(CoreError::ExtractionError(_))));
    }
}
