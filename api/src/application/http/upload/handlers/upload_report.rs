use axum::{
    Extension,
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
};
use pearl_core::domain::{
    authentication::value_objects::Identity,
    report::entities::ReportMetadata,
    storage::{
        entities::{FileUpload, mime_type_for_extension},
        ports::UploadService,
        value_objects::{UploadReceipt, UploadReportInput},
    },
};
use tracing::{error, info};

use crate::application::http::{
    server::{
        api_entities::{api_error::ApiError, response::Response},
        app_state::AppState,
    },
    upload::validators::{parse_metadata, parse_report_date, parse_tags},
};

fn content_type_for(filename: &str, declared: Option<&str>) -> String {
    match declared {
        Some(ct) if !ct.is_empty() && ct != "application/octet-stream" => ct.to_string(),
        _ => {
            let extension = filename.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
            mime_type_for_extension(extension).to_string()
        }
    }
}

fn multipart_error(context: &str, e: MultipartError) -> ApiError {
    error!("{}: {}", context, e);

    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge("File too large".to_string())
    } else {
        ApiError::BadRequest(format!("{context}: {}", e.body_text()))
    }
}

/// Collects the `files` parts and the form fields into an upload request.
async fn read_upload_form(mut multipart: Multipart) -> Result<UploadReportInput, ApiError> {
    let mut input = UploadReportInput {
        files: Vec::new(),
        title: None,
        description: None,
        report_date: None,
        metadata: ReportMetadata::default(),
        tags: Vec::new(),
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Failed to read multipart field", e))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "files" => {
                let original_name = field.file_name().unwrap_or("upload").to_string();
                let mimetype = content_type_for(&original_name, field.content_type());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error("Failed to read file", e))?;

                input.files.push(FileUpload {
                    original_name,
                    mimetype,
                    data,
                });
            }
            "title" | "description" | "reportDate" | "metadata" | "tags" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| multipart_error(&format!("Failed to read {name}"), e))?;

                match name.as_str() {
                    "title" => input.title = Some(text),
                    "description" => input.description = Some(text),
                    "reportDate" => input.report_date = parse_report_date(&text)?,
                    "metadata" => input.metadata = parse_metadata(&text)?,
                    _ => input.tags = parse_tags(&text),
                }
            }
            _ => {}
        }
    }

    Ok(input)
}

#[utoipa::path(
    post,
    path = "",
    tag = "upload",
    summary = "Upload a report",
    description = "Multipart upload of 1-5 files in the `files` field, with optional title, description, reportDate, metadata (JSON) and tags.",
    request_body(content_type = "multipart/form-data", description = "Report files and details"),
    responses(
        (status = 201, body = UploadReceipt),
        (status = 400, description = "No files, bad file type or invalid form field"),
        (status = 413, description = "File too large")
    )
)]
pub async fn upload_report(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    multipart: Multipart,
) -> Result<Response<UploadReceipt>, ApiError> {
    let input = read_upload_form(multipart).await?;

    let receipt = state
        .service
        .upload_report(identity, input)
        .await
        .map_err(ApiError::from)?;

    info!(
        report_id = %receipt.report_id,
        files = receipt.files_uploaded,
        "report uploaded"
    );

    Ok(Response::Created(receipt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, extract::DefaultBodyLimit, routing::post};
    use axum_test::{
        TestServer,
        multipart::{MultipartForm, Part},
    };
    use serde_json::Value;

    async fn echo_form(multipart: Multipart) -> Result<String, ApiError> {
        let input = read_upload_form(multipart).await?;
        Ok(format!(
            "{} {}",
            input.files.len(),
            input.title.unwrap_or_default()
        ))
    }

    fn server(limit: usize) -> TestServer {
        let app = Router::new()
            .route("/", post(echo_form))
            .layer(DefaultBodyLimit::max(limit));
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_form_fields_are_collected() {
        let form = MultipartForm::new()
            .add_text("title", "Thyroid panel")
            .add_part(
                "files",
                Part::bytes(b"%PDF-1.4".to_vec())
                    .file_name("lab.pdf")
                    .mime_type("application/pdf"),
            );

        let response = server(1024 * 1024).post("/").multipart(form).await;

        response.assert_status_ok();
        response.assert_text("1 Thyroid panel");
    }

    #[tokio::test]
    async fn test_body_over_limit_is_payload_too_large() {
        let form = MultipartForm::new().add_part(
            "files",
            Part::bytes(vec![0u8; 64 * 1024])
                .file_name("scan.png")
                .mime_type("image/png"),
        );

        let response = server(16 * 1024).post("/").multipart(form).await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "File too large");
    }

    #[test]
    fn test_content_type_falls_back_to_extension() {
        assert_eq!(content_type_for("scan.PNG", None), "image/png");
        assert_eq!(
            content_type_for("lab.pdf", Some("application/octet-stream")),
            "application/pdf"
        );
        assert_eq!(content_type_for("lab.pdf", Some("image/jpeg")), "image/jpeg");
    }
}
