use bytes::Bytes;
use sha2::{Digest, Sha256};

use crate::domain::common::round2;

pub const THUMBNAIL_PREFIX: &str = "thumb_";

pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

const EXTENSION_MIME_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
];

/// A file received in an upload request, not yet written anywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpload {
    pub original_name: String,
    pub mimetype: String,
    pub data: Bytes,
}

impl FileUpload {
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn checksum_sha256(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.data);
        hex::encode(hasher.finalize())
    }

    /// Extension for the stored copy, taken from the sanitized name or else the MIME type.
    pub fn stored_extension(&self) -> String {
        let sanitized = sanitize_filename(&self.original_name);
        match sanitized.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
                format!(".{}", ext.to_lowercase())
            }
            _ => extension_for_mime_type(&self.mimetype)
                .map(|ext| format!(".{ext}"))
                .unwrap_or_default(),
        }
    }
}

pub fn is_allowed_mime_type(mimetype: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&mimetype)
}

pub fn mime_type_for_extension(extension: &str) -> &'static str {
    let extension = extension.trim_start_matches('.').to_lowercase();
    EXTENSION_MIME_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| *mime)
        .unwrap_or("application/octet-stream")
}

pub fn extension_for_mime_type(mimetype: &str) -> Option<&'static str> {
    EXTENSION_MIME_TYPES
        .iter()
        .find(|(_, mime)| *mime == mimetype)
        .map(|(ext, _)| *ext)
}

/// Keeps `[a-zA-Z0-9.-]`, maps the rest to `_`, collapses runs of `_` and trims them from the ends.
pub fn sanitize_filename(filename: &str) -> String {
    let mut out = String::with_capacity(filename.len());
    for c in filename.chars() {
        let c = if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
            c
        } else {
            '_'
        };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }

    out.trim_matches('_').to_string()
}

pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{} {}", round2(value), UNITS[unit])
}

pub fn thumbnail_name(filename: &str) -> String {
    format!("{THUMBNAIL_PREFIX}{filename}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, mimetype: &str) -> FileUpload {
        FileUpload {
            original_name: name.to_string(),
            mimetype: mimetype.to_string(),
            data: Bytes::from_static(b"hello"),
        }
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("my  report (1).pdf"), "my_report_1_.pdf");
        assert_eq!(sanitize_filename("__lab__results__"), "lab_results");
        assert_eq!(sanitize_filename("résumé.PDF"), "r_sum_.PDF");
    }

    #[test]
    fn test_stored_extension() {
        assert_eq!(upload("scan.JPG", "image/jpeg").stored_extension(), ".jpg");
        assert_eq!(upload("scan", "application/pdf").stored_extension(), ".pdf");
        assert_eq!(upload(".hidden", "image/png").stored_extension(), ".png");
        assert_eq!(upload("blob", "application/x-unknown").stored_extension(), "");
    }

    #[test]
    fn test_checksum() {
        assert_eq!(
            upload("a", "image/png").checksum_sha256(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_mime_lookup() {
        assert_eq!(mime_type_for_extension(".PDF"), "application/pdf");
        assert_eq!(mime_type_for_extension("exe"), "application/octet-stream");
        assert!(is_allowed_mime_type("image/webp"));
        assert!(!is_allowed_mime_type("image/gif"));
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(10 * 1024 * 1024), "10 MB");
    }
}
