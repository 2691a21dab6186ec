use std::io::{Cursor, Read};

use quick_xml::{Reader, events::Event};

use crate::domain::common::entities::app_errors::CoreError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Raw text of a .docx, one line per paragraph.
pub fn extract_docx_text(data: &[u8]) -> Result<String, CoreError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))
        .map_err(|e| CoreError::ExtractionError(format!("Invalid DOCX archive: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| CoreError::ExtractionError(format!("DOCX has no document body: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| CoreError::ExtractionError(format!("Failed to read DOCX body: {e}")))?;

    parse_document_xml(&xml)
}

fn parse_document_xml(xml: &str) -> Result<String, CoreError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"t" => in_run_text = true,
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_run_text = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) if in_run_text => {
                text.push_str(&e.unescape().unwrap_or_default());
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(CoreError::ExtractionError(format!(
                    "DOCX XML parsing error: {e}"
                )));
            }
            _ => {}
        }
    }

    Ok(text.trim_end().to_string())
}

#[cfg(test)]
pub(super) mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>TSH</w:t></w:r><w:r><w:t xml:space="preserve"> 2.1 mIU/L</w:t></w:r></w:p>
    <w:p><w:r><w:t>Estradiol 85 pg/mL</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    pub(in crate::infrastructure::extraction) fn docx_bytes(body: &str) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buffer);
            writer
                .start_file(DOCUMENT_PART, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(body.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        buffer.into_inner()
    }

    #[test]
    fn test_paragraphs_become_lines() {
        let text = parse_document_xml(BODY).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("TSH"));
        assert!(lines[0].ends_with("mIU/L"));
        assert_eq!(lines[1], "Estradiol 85 pg/mL");
    }

    #[test]
    fn test_extract_from_archive() {
        let text = extract_docx_text(&docx_bytes(BODY)).unwrap();

        assert!(text.contains("Estradiol 85 pg/mL"));
    }

    #[test]
    fn test_not_a_zip() {
        let result = extract_docx_text(b"plain text");

        assert!(matches!(result, Err(CoreError::ExtractionError(_))));
    }
}
