use std::future::Future;

use bytes::Bytes;
use uuid::Uuid;

use crate::domain::{
    authentication::value_objects::Identity, common::entities::app_errors::CoreError,
};

use super::value_objects::{FileContent, FileInfo, UploadProgress, UploadReceipt, UploadReportInput};

/// Port for the disk holding uploaded files and thumbnails
#[cfg_attr(test, mockall::automock)]
pub trait FileStorage: Send + Sync {
    /// Writes `data` under the user's directory and returns the stored path.
    fn save(
        &self,
        user_id: Uuid,
        filename: String,
        data: Bytes,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;

    /// Fails with `FileNotFound` when nothing exists at `path`.
    fn read(&self, path: String) -> impl Future<Output = Result<Bytes, CoreError>> + Send;

    /// Removing a missing file is not an error.
    fn delete(&self, path: String) -> impl Future<Output = Result<(), CoreError>> + Send;
}

#[cfg_attr(test, mockall::automock)]
pub trait ThumbnailGenerator: Send + Sync {
    /// Encodes a JPEG preview of the image that fits the thumbnail bounds.
    fn generate(&self, image: Bytes) -> impl Future<Output = Result<Bytes, CoreError>> + Send;
}

/// Service trait for report uploads and the files attached to them
#[cfg_attr(test, mockall::automock)]
pub trait UploadService: Send + Sync {
    fn upload_report(
        &self,
        identity: Identity,
        input: UploadReportInput,
    ) -> impl Future<Output = Result<UploadReceipt, CoreError>> + Send;

    fn get_progress(
        &self,
        identity: Identity,
        report_id: String,
    ) -> impl Future<Output = Result<UploadProgress, CoreError>> + Send;

    fn get_file_info(
        &self,
        identity: Identity,
        report_id: String,
        index: usize,
    ) -> impl Future<Output = Result<FileInfo, CoreError>> + Send;

    fn delete_file(
        &self,
        identity: Identity,
        report_id: String,
        index: usize,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn download_file(
        &self,
        identity: Identity,
        report_id: String,
        index: usize,
    ) -> impl Future<Output = Result<FileContent, CoreError>> + Send;

    fn get_thumbnail(
        &self,
        identity: Identity,
        report_id: String,
        index: usize,
    ) -> impl Future<Output = Result<Bytes, CoreError>> + Send;
}
