use crate::domain::common::entities::app_errors::CoreError;

/// Marker lopdf emits for CID fonts it cannot decode.
const IDENTITY_H_PATTERN: &str = "?Identity-H Unimplemented?";

const MIN_CHARS_FOR_RATIO_CHECK: usize = 50;
const MIN_ALPHANUMERIC_PERCENT: usize = 10;

/// Text layer of every page, joined with newlines.
pub fn extract_text_layer(data: &[u8]) -> Result<String, CoreError> {
    let doc = lopdf::Document::load_mem(data)
        .map_err(|e| CoreError::ExtractionError(format!("Failed to read PDF: {e}")))?;

    let mut text = String::new();
    for (page_num, _) in doc.get_pages() {
        if let Ok(page_text) = doc.extract_text(&[page_num]) {
            text.push_str(&page_text);
            text.push('\n');
        }
    }

    Ok(text)
}

/// True when the text layer is empty or too garbled to parse.
pub fn should_use_ocr(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return true;
    }

    if trimmed
        .replace(IDENTITY_H_PATTERN, "")
        .trim()
        .is_empty()
    {
        return true;
    }

    let total_chars = trimmed.chars().count();
    let alphanumeric_chars = trimmed.chars().filter(|c| c.is_alphanumeric()).count();

    total_chars > MIN_CHARS_FOR_RATIO_CHECK
        && alphanumeric_chars * 100 < total_chars * MIN_ALPHANUMERIC_PERCENT
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::{Document, Object, Stream, dictionary};

    /// One-page PDF whose page draws nothing, like a scan without a text layer.
    pub(crate) fn blank_pdf_bytes() -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_should_use_ocr() {
        assert!(should_use_ocr(""));
        assert!(should_use_ocr("  \n "));
        assert!(should_use_ocr(
            "?Identity-H Unimplemented?\n?Identity-H Unimplemented?"
        ));
        assert!(should_use_ocr(&"#.-/ ".repeat(20)));
        assert!(!should_use_ocr("TSH 2.1 mIU/L (0.27 - 4.2)"));
        assert!(!should_use_ocr("--- ok"));
    }

    #[test]
    fn test_corrupted_pdf() {
        let result = extract_text_layer(b"%PDF-1.4 definitely broken");

        assert!(matches!(result, Err(CoreError::ExtractionError(_))));
    }

    #[test]
    fn test_blank_page_has_no_usable_text() {
        let text = extract_text_layer(&blank_pdf_bytes()).unwrap();

        assert!(should_use_ocr(&text));
    }
}
