use std::path::{Path, PathBuf};

use tracing::{error, info, instrument, warn};

use crate::domain::{analysis::ports::TextExtractor, common::entities::app_errors::CoreError};

pub mod docx;
pub mod ocr;
pub mod pdf;

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const MSWORD_MIME: &str = "application/msword";

/// Extracts report text with lopdf, zip/quick-xml and the tesseract CLI.
///
/// Scanned PDFs are rasterized with pdftoppm before OCR.
#[derive(Debug, Clone)]
pub struct DocumentTextExtractor {
    tesseract_bin: String,
    pdftoppm_bin: String,
    languages: String,
}

impl DocumentTextExtractor {
    pub fn new(
        tesseract_bin: impl Into<String>,
        pdftoppm_bin: impl Into<String>,
        languages: impl Into<String>,
    ) -> Self {
        Self {
            tesseract_bin: tesseract_bin.into(),
            pdftoppm_bin: pdftoppm_bin.into(),
            languages: languages.into(),
        }
    }

    async fn read(path: &Path) -> Result<Vec<u8>, CoreError> {
        tokio::fs::read(path).await.map_err(|e| {
            error!("Failed to read {}: {}", path.display(), e);
            CoreError::ExtractionError(format!("Failed to read file: {e}"))
        })
    }

    async fn extract_pdf(&self, path: &Path) -> Result<String, CoreError> {
        let data = Self::read(path).await?;
        let text_layer = tokio::task::spawn_blocking(move || pdf::extract_text_layer(&data))
            .await
            .map_err(|e| {
                error!("PDF extraction task panicked: {}", e);
                CoreError::ExtractionError("PDF extraction was interrupted".to_string())
            })?;

        let text_layer = match text_layer {
            Ok(text) if !pdf::should_use_ocr(&text) => return Ok(text.trim().to_string()),
            Ok(text) => {
                info!("PDF text layer unusable, trying OCR");
                text.trim().to_string()
            }
            Err(e) => {
                warn!("PDF text layer unreadable, trying OCR: {}", e);
                return self.ocr_pdf(path).await.map_err(|_| e);
            }
        };

        match self.ocr_pdf(path).await {
            Ok(text) => Ok(text),
            Err(e) => {
                warn!("OCR fallback failed, keeping the text layer: {}", e);
                Ok(text_layer)
            }
        }
    }

    async fn ocr_pdf(&self, path: &Path) -> Result<String, CoreError> {
        ocr::recognize_pdf(
            &self.tesseract_bin,
            &self.pdftoppm_bin,
            &self.languages,
            path,
        )
        .await
    }

    async fn extract_docx(&self, path: &Path) -> Result<String, CoreError> {
        let data = Self::read(path).await?;
        tokio::task::spawn_blocking(move || docx::extract_docx_text(&data))
            .await
            .map_err(|e| {
                error!("DOCX extraction task panicked: {}", e);
                CoreError::ExtractionError("DOCX extraction was interrupted".to_string())
            })?
    }
}

impl TextExtractor for DocumentTextExtractor {
    #[instrument(skip(self))]
    async fn extract(&self, path: String, mimetype: String) -> Result<String, CoreError> {
        let path = PathBuf::from(path);

        match mimetype.as_str() {
            m if m.starts_with("image/") => {
                ocr::recognize(&self.tesseract_bin, &self.languages, &path).await
            }
            "application/pdf" => self.extract_pdf(&path).await,
            DOCX_MIME => self.extract_docx(&path).await,
            MSWORD_MIME => Err(CoreError::UnsupportedFormat(
                "Legacy .doc files are not supported, please convert to .docx or PDF".to_string(),
            )),
            other => Err(CoreError::UnsupportedFormat(format!(
                "Unsupported file type: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn extractor() -> DocumentTextExtractor {
        DocumentTextExtractor::new("pearl-no-such-ocr-binary", "pearl-no-such-pdftoppm", "eng")
    }

    #[tokio::test]
    async fn test_docx_is_read_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.docx");
        std::fs::write(
            &path,
            docx::tests::docx_bytes(
                r#"<w:document xmlns:w="urn:w"><w:body><w:p><w:r><w:t>LH 5.2 mIU/mL</w:t></w:r></w:p></w:body></w:document>"#,
            ),
        )
        .unwrap();

        let text = extractor()
            .extract(path.display().to_string(), DOCX_MIME.to_string())
            .await
            .unwrap();

        assert_eq!(text, "LH 5.2 mIU/mL");
    }

    #[tokio::test]
    async fn test_legacy_doc_is_unsupported() {
        let result = extractor()
            .extract("/tmp/old.doc".to_string(), MSWORD_MIME.to_string())
            .await;

        assert!(matches!(result, Err(CoreError::UnsupportedFormat(_))));
    }

    #[tokio::test]
    async fn test_missing_file_is_extraction_error() {
        let result = extractor()
            .extract(
                "/definitely/not/here.pdf".to_string(),
                "application/pdf".to_string(),
            )
            .await;

        assert!(matches!(result, Err(CoreError::ExtractionError(_))));
    }

    #[tokio::test]
    async fn test_image_without_ocr_engine_fails() {
        let result = extractor()
            .extract("/tmp/scan.png".to_string(), "image/png".to_string())
            .await;

        assert!(matches!(result, Err(CoreError::ExtractionError(_))));
    }

    #[tokio::test]
    async fn test_unreadable_pdf_keeps_parse_error_without_ocr() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"%PDF-1.4 definitely broken").unwrap();

        let result = extractor()
            .extract(path.display().to_string(), "application/pdf".to_string())
            .await;

        match result {
            Err(CoreError::ExtractionError(message)) => {
                assert!(message.starts_with("Failed to read PDF"))
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_scanned_pdf_is_read_from_rendered_pages() {
        use super::ocr::tests::{FAKE_PDFTOPPM, FAKE_TESSERACT, fake_tool};

        let dir = TempDir::new().unwrap();
        let pdftoppm = fake_tool(dir.path(), "pdftoppm", FAKE_PDFTOPPM);
        let tesseract = fake_tool(dir.path(), "tesseract", FAKE_TESSERACT);
        let path = dir.path().join("scan.pdf");
        std::fs::write(&path, pdf::tests::blank_pdf_bytes()).unwrap();

        let text = DocumentTextExtractor::new(tesseract, pdftoppm, "eng")
            .extract(path.display().to_string(), "application/pdf".to_string())
            .await
            .unwrap();

        assert_eq!(text, "read page-1.png\nread page-2.png");
        assert!(!text.contains("scan.pdf"));
    }
}
