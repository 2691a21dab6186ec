use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::report::entities::{ProcessingError, ReportMetadata, ReportStatus, UploadedFile};

use super::entities::FileUpload;

#[derive(Debug, Clone, Default)]
pub struct UploadReportInput {
    pub files: Vec<FileUpload>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub report_date: Option<DateTime<Utc>>,
    pub metadata: ReportMetadata,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceipt {
    pub report_id: String,
    pub id: Uuid,
    pub files_uploaded: usize,
    pub status: ReportStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadProgress {
    pub report_id: String,
    pub status: ReportStatus,
    pub progress: u8,
    pub files_count: usize,
    pub processing_errors: Vec<ProcessingError>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Links are relative to the API root path.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub original_name: String,
    pub mimetype: String,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
    pub download_url: String,
    pub thumbnail_url: Option<String>,
}

impl FileInfo {
    pub fn new(report_id: &str, index: usize, file: &UploadedFile) -> Self {
        Self {
            original_name: file.original_name.clone(),
            mimetype: file.mimetype.clone(),
            size: file.size,
            uploaded_at: file.uploaded_at,
            download_url: format!("/upload/download/{report_id}/{index}"),
            thumbnail_url: file
                .thumbnail_path
                .as_ref()
                .map(|_| format!("/upload/thumbnail/{report_id}/{index}")),
        }
    }

    pub fn with_root(mut self, root_path: &str) -> Self {
        self.download_url = format!("{root_path}{}", self.download_url);
        self.thumbnail_url = self.thumbnail_url.map(|url| format!("{root_path}{url}"));
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileContent {
    pub original_name: String,
    pub mimetype: String,
    pub body: Bytes,
}
