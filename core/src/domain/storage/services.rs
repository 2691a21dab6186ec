use bytes::Bytes;
use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use crate::domain::{
    analysis::ports::{LLMClient, TextExtractor},
    authentication::{
        ports::{GoogleTokenVerifier, TokenRepository},
        value_objects::Identity,
    },
    common::{entities::app_errors::CoreError, services::Service},
    health::ports::HealthCheckRepository,
    report::{
        entities::{Report, UploadedFile},
        ports::ReportRepository,
    },
    storage::{
        entities::{FileUpload, is_allowed_mime_type, thumbnail_name},
        ports::{FileStorage, ThumbnailGenerator, UploadService},
        value_objects::{FileContent, FileInfo, UploadProgress, UploadReceipt, UploadReportInput},
    },
    user::ports::UserRepository,
};

impl<U, RP, HC, LLM, TE, FS, TH, TK, GV> Service<U, RP, HC, LLM, TE, FS, TH, TK, GV>
where
    U: UserRepository,
    RP: ReportRepository,
    HC: HealthCheckRepository,
    LLM: LLMClient,
    TE: TextExtractor,
    FS: FileStorage,
    TH: ThumbnailGenerator,
    TK: TokenRepository,
    GV: GoogleTokenVerifier,
{
    fn check_upload(&self, files: &[FileUpload]) -> Result<(), CoreError> {
        let limits = &self.storage_config;

        if files.is_empty() {
            return Err(CoreError::NoFilesUploaded);
        }
        if files.len() > limits.max_files {
            return Err(CoreError::TooManyFiles(limits.max_files));
        }

        let mut total = 0;
        for file in files {
            if !is_allowed_mime_type(&file.mimetype) {
                return Err(CoreError::UnsupportedFileType(file.mimetype.clone()));
            }
            if file.size() > limits.max_file_size {
                return Err(CoreError::FileTooLarge);
            }
            total += file.size();
        }

        if total > limits.max_total_size {
            return Err(CoreError::FileTooLarge);
        }

        Ok(())
    }

    /// Stores one upload, plus a thumbnail for images. Returns every path written.
    async fn store_file(
        &self,
        user_id: Uuid,
        file: FileUpload,
    ) -> Result<(UploadedFile, Vec<String>), CoreError> {
        let filename = format!("{}{}", Uuid::new_v4(), file.stored_extension());
        let checksum_sha256 = file.checksum_sha256();
        let size = file.size();

        let path = self
            .file_storage
            .save(user_id, filename.clone(), file.data.clone())
            .await?;
        let mut written = vec![path.clone()];

        let mut stored = UploadedFile {
            original_name: file.original_name,
            filename,
            path,
            mimetype: file.mimetype,
            size,
            checksum_sha256,
            uploaded_at: Utc::now(),
            thumbnail_path: None,
        };

        if stored.is_image() {
            match self.create_thumbnail(user_id, &stored.filename, file.data).await {
                Ok(thumbnail_path) => {
                    written.push(thumbnail_path.clone());
                    stored.thumbnail_path = Some(thumbnail_path);
                }
                Err(e) => {
                    tracing::warn!(filename = %stored.filename, error = %e, "failed to create thumbnail");
                }
            }
        }

        Ok((stored, written))
    }

    async fn create_thumbnail(
        &self,
        user_id: Uuid,
        filename: &str,
        image: Bytes,
    ) -> Result<String, CoreError> {
        let thumbnail = self.thumbnail_generator.generate(image).await?;
        self.file_storage
            .save(user_id, thumbnail_name(filename), thumbnail)
            .await
    }

    async fn remove_paths(&self, paths: Vec<String>) {
        for path in paths {
            if let Err(e) = self.file_storage.delete(path.clone()).await {
                tracing::warn!(path = %path, error = %e, "failed to remove stored file");
            }
        }
    }

    /// Removes a stored file and its thumbnail, tolerating either being gone already.
    pub(crate) async fn remove_uploaded_file(&self, file: &UploadedFile) {
        let mut paths = vec![file.path.clone()];
        if let Some(thumbnail) = &file.thumbnail_path {
            paths.push(thumbnail.clone());
        }
        self.remove_paths(paths).await;
    }

    pub(crate) async fn owned_report(
        &self,
        identity: &Identity,
        report_id: String,
    ) -> Result<Report, CoreError> {
        self.report_repository
            .get_by_report_id(identity.id(), report_id)
            .await?
            .ok_or(CoreError::ReportNotFound)
    }
}

impl<U, RP, HC, LLM, TE, FS, TH, TK, GV> UploadService
    for Service<U, RP, HC, LLM, TE, FS, TH, TK, GV>
where
    U: UserRepository,
    RP: ReportRepository,
    HC: HealthCheckRepository,
    LLM: LLMClient,
    TE: TextExtractor,
    FS: FileStorage,
    TH: ThumbnailGenerator,
    TK: TokenRepository,
    GV: GoogleTokenVerifier,
{
    #[instrument(skip(self, identity, input), fields(user_id = %identity.id(), files = input.files.len()))]
    async fn upload_report(
        &self,
        identity: Identity,
        input: UploadReportInput,
    ) -> Result<UploadReceipt, CoreError> {
        self.check_upload(&input.files)?;

        let user_id = identity.id();
        let mut uploaded_files = Vec::with_capacity(input.files.len());
        let mut written = Vec::new();

        for file in input.files {
            match self.store_file(user_id, file).await {
                Ok((stored, paths)) => {
                    uploaded_files.push(stored);
                    written.extend(paths);
                }
                Err(e) => {
                    self.remove_paths(written).await;
                    return Err(e);
                }
            }
        }

        let report = Report::new(
            user_id,
            input.title,
            input.description,
            input.report_date,
            uploaded_files,
            input.metadata,
            input.tags,
        );

        let report = match self.report_repository.create(report).await {
            Ok(report) => report,
            Err(e) => {
                self.remove_paths(written).await;
                return Err(e);
            }
        };

        tracing::info!(
            report_id = %report.report_id,
            files = report.uploaded_files.len(),
            "report uploaded"
        );

        Ok(UploadReceipt {
            report_id: report.report_id,
            id: report.id,
            files_uploaded: report.uploaded_files.len(),
            status: report.status,
        })
    }

    #[instrument(skip(self, identity), fields(user_id = %identity.id()))]
    async fn get_progress(
        &self,
        identity: Identity,
        report_id: String,
    ) -> Result<UploadProgress, CoreError> {
        let report = self.owned_report(&identity, report_id).await?;

        Ok(UploadProgress {
            progress: report.status.progress(),
            files_count: report.uploaded_files.len(),
            report_id: report.report_id,
            status: report.status,
            processing_errors: report.processing_errors,
            created_at: report.created_at,
            updated_at: report.updated_at,
        })
    }

    #[instrument(skip(self, identity), fields(user_id = %identity.id()))]
    async fn get_file_info(
        &self,
        identity: Identity,
        report_id: String,
        index: usize,
    ) -> Result<FileInfo, CoreError> {
        let report = self.owned_report(&identity, report_id).await?;
        let file = report.file(index).ok_or(CoreError::InvalidFileIndex)?;

        Ok(FileInfo::new(&report.report_id, index, file))
    }

    #[instrument(skip(self, identity), fields(user_id = %identity.id()))]
    async fn delete_file(
        &self,
        identity: Identity,
        report_id: String,
        index: usize,
    ) -> Result<(), CoreError> {
        let mut report = self.owned_report(&identity, report_id).await?;
        if index >= report.uploaded_files.len() {
            return Err(CoreError::InvalidFileIndex);
        }

        let file = report.uploaded_files.remove(index);
        self.remove_uploaded_file(&file).await;

        let report = self.report_repository.update(report).await?;
        tracing::info!(report_id = %report.report_id, index, "uploaded file deleted");

        Ok(())
    }

    #[instrument(skip(self, identity), fields(user_id = %identity.id()))]
    async fn download_file(
        &self,
        identity: Identity,
        report_id: String,
        index: usize,
    ) -> Result<FileContent, CoreError> {
        let report = self.owned_report(&identity, report_id).await?;
        let file = report.file(index).ok_or(CoreError::InvalidFileIndex)?;

        let body = self.file_storage.read(file.path.clone()).await?;

        Ok(FileContent {
            original_name: file.original_name.clone(),
            mimetype: file.mimetype.clone(),
            body,
        })
    }

    #[instrument(skip(self, identity), fields(user_id = %identity.id()))]
    async fn get_thumbnail(
        &self,
        identity: Identity,
        report_id: String,
        index: usize,
    ) -> Result<Bytes, CoreError> {
        let report = self.owned_report(&identity, report_id).await?;
        let file = report.file(index).ok_or(CoreError::InvalidFileIndex)?;
        let thumbnail = file
            .thumbnail_path
            .clone()
            .ok_or(CoreError::ThumbnailNotFound)?;

        self.file_storage
            .read(thumbnail)
            .await
            .map_err(|e| match e {
                CoreError::FileNotFound => CoreError::ThumbnailNotFound,
                other => other,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        common::services::test_support::Mocks, report::entities::ReportMetadata,
        user::entities::User,
    };
    use std::sync::{Arc, Mutex};

    fn identity() -> Identity {
        Identity::new(User::new("g".into(), "a@b.c".into(), "A".into(), None))
    }

    fn file(name: &str, mimetype: &str, len: usize) -> FileUpload {
        FileUpload {
            original_name: name.to_string(),
            mimetype: mimetype.to_string(),
            data: Bytes::from(vec![1u8; len]),
        }
    }

    fn input(files: Vec<FileUpload>) -> UploadReportInput {
        UploadReportInput {
            files,
            ..Default::default()
        }
    }

    fn stored_report(user_id: Uuid, with_thumbnail: bool) -> Report {
        Report::new(
            user_id,
            None,
            None,
            None,
            vec![UploadedFile {
                original_name: "scan.png".to_string(),
                filename: "abc.png".to_string(),
                path: "uploads/u/abc.png".to_string(),
                mimetype: "image/png".to_string(),
                size: 10,
                checksum_sha256: String::new(),
                uploaded_at: Utc::now(),
                thumbnail_path: with_thumbnail.then(|| "uploads/u/thumb_abc.png".to_string()),
            }],
            ReportMetadata::default(),
            Vec::new(),
        )
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_and_bad_types() {
        let service = Mocks::default().into_service();

        let empty = service.upload_report(identity(), input(Vec::new())).await;
        assert_eq!(empty.unwrap_err(), CoreError::NoFilesUploaded);

        let gif = service
            .upload_report(identity(), input(vec![file("a.gif", "image/gif", 4)]))
            .await;
        assert_eq!(
            gif.unwrap_err(),
            CoreError::UnsupportedFileType("image/gif".to_string())
        );

        let six = (0..6).map(|_| file("a.pdf", "application/pdf", 1)).collect();
        let too_many = service.upload_report(identity(), input(six)).await;
        assert_eq!(too_many.unwrap_err(), CoreError::TooManyFiles(5));
    }

    #[tokio::test]
    async fn test_upload_rejects_oversized_file() {
        let service = Mocks::default().into_service();
        let big = file("big.pdf", "application/pdf", 10 * 1024 * 1024 + 1);

        let result = service.upload_report(identity(), input(vec![big])).await;

        assert_eq!(result.unwrap_err(), CoreError::FileTooLarge);
    }

    #[tokio::test]
    async fn test_upload_stores_files_and_thumbnail() {
        let mut mocks = Mocks::default();
        mocks
            .storage
            .expect_save()
            .times(3)
            .returning(|user_id, filename, _| {
                Box::pin(async move { Ok(format!("uploads/{user_id}/{filename}")) })
            });
        mocks
            .thumbnails
            .expect_generate()
            .times(1)
            .returning(|_| Box::pin(async move { Ok(Bytes::from_static(b"jpeg")) }));
        mocks
            .reports
            .expect_create()
            .returning(|report| Box::pin(async move { Ok(report) }));

        let receipt = mocks
            .into_service()
            .upload_report(
                identity(),
                input(vec![
                    file("lab.pdf", "application/pdf", 10),
                    file("scan.png", "image/png", 10),
                ]),
            )
            .await
            .unwrap();

        assert_eq!(receipt.files_uploaded, 2);
        assert!(receipt.report_id.starts_with("RPT-"));
    }

    #[tokio::test]
    async fn test_thumbnail_failure_is_tolerated() {
        let mut mocks = Mocks::default();
        mocks
            .storage
            .expect_save()
            .times(1)
            .returning(|_, filename, _| Box::pin(async move { Ok(filename) }));
        mocks.thumbnails.expect_generate().returning(|_| {
            Box::pin(async move { Err(CoreError::StorageError("bad image".to_string())) })
        });
        mocks
            .reports
            .expect_create()
            .withf(|report| report.uploaded_files[0].thumbnail_path.is_none())
            .returning(|report| Box::pin(async move { Ok(report) }));

        let receipt = mocks
            .into_service()
            .upload_report(identity(), input(vec![file("scan.jpg", "image/jpeg", 10)]))
            .await
            .unwrap();

        assert_eq!(receipt.files_uploaded, 1);
    }

    #[tokio::test]
    async fn test_failed_persistence_removes_written_files() {
        let deleted = Arc::new(Mutex::new(Vec::new()));
        let sink = deleted.clone();

        let mut mocks = Mocks::default();
        mocks
            .storage
            .expect_save()
            .returning(|_, filename, _| Box::pin(async move { Ok(filename) }));
        mocks.storage.expect_delete().returning(move |path| {
            sink.lock().unwrap().push(path);
            Box::pin(async move { Ok(()) })
        });
        mocks
            .reports
            .expect_create()
            .returning(|_| Box::pin(async move { Err(CoreError::InternalServerError) }));

        let result = mocks
            .into_service()
            .upload_report(
                identity(),
                input(vec![
                    file("a.pdf", "application/pdf", 1),
                    file("b.pdf", "application/pdf", 1),
                ]),
            )
            .await;

        assert_eq!(result.unwrap_err(), CoreError::InternalServerError);
        assert_eq!(deleted.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_progress_of_missing_report() {
        let mut mocks = Mocks::default();
        mocks
            .reports
            .expect_get_by_report_id()
            .returning(|_, _| Box::pin(async move { Ok(None) }));

        let result = mocks
            .into_service()
            .get_progress(identity(), "RPT-X".to_string())
            .await;

        assert_eq!(result.unwrap_err(), CoreError::ReportNotFound);
    }

    #[tokio::test]
    async fn test_delete_file_invalid_index() {
        let mut mocks = Mocks::default();
        mocks.reports.expect_get_by_report_id().returning(|user_id, _| {
            let report = stored_report(user_id, false);
            Box::pin(async move { Ok(Some(report)) })
        });

        let result = mocks
            .into_service()
            .delete_file(identity(), "RPT-X".to_string(), 3)
            .await;

        assert_eq!(result.unwrap_err(), CoreError::InvalidFileIndex);
    }

    #[tokio::test]
    async fn test_delete_file_removes_file_and_thumbnail() {
        let mut mocks = Mocks::default();
        mocks.reports.expect_get_by_report_id().returning(|user_id, _| {
            let report = stored_report(user_id, true);
            Box::pin(async move { Ok(Some(report)) })
        });
        mocks
            .storage
            .expect_delete()
            .times(2)
            .returning(|_| Box::pin(async move { Ok(()) }));
        mocks
            .reports
            .expect_update()
            .withf(|report| report.uploaded_files.is_empty())
            .returning(|report| Box::pin(async move { Ok(report) }));

        mocks
            .into_service()
            .delete_file(identity(), "RPT-X".to_string(), 0)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_file_info_links() {
        let mut mocks = Mocks::default();
        mocks.reports.expect_get_by_report_id().returning(|user_id, _| {
            let mut report = stored_report(user_id, true);
            report.report_id = "RPT-1".to_string();
            Box::pin(async move { Ok(Some(report)) })
        });

        let info = mocks
            .into_service()
            .get_file_info(identity(), "RPT-1".to_string(), 0)
            .await
            .unwrap()
            .with_root("/api");

        assert_eq!(info.download_url, "/api/upload/download/RPT-1/0");
        assert_eq!(
            info.thumbnail_url.as_deref(),
            Some("/api/upload/thumbnail/RPT-1/0")
        );
    }

    #[tokio::test]
    async fn test_missing_thumbnail() {
        let mut mocks = Mocks::default();
        mocks.reports.expect_get_by_report_id().returning(|user_id, _| {
            let report = stored_report(user_id, false);
            Box::pin(async move { Ok(Some(report)) })
        });

        let result = mocks
            .into_service()
            .get_thumbnail(identity(), "RPT-X".to_string(), 0)
            .await;

        assert_eq!(result.unwrap_err(), CoreError::ThumbnailNotFound);
    }
}
