use axum::{
    Extension,
    extract::{Path, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response as AxumResponse},
};
use pearl_core::domain::{authentication::value_objects::Identity, storage::ports::UploadService};

use crate::application::http::{
    server::{api_entities::api_error::ApiError, app_state::AppState},
    upload::validators::parse_file_index,
};

/// Quotes are not allowed inside the quoted filename parameter.
pub fn attachment_header(filename: &str) -> String {
    format!("attachment; filename=\"{}\"", filename.replace('"', "'"))
}

#[utoipa::path(
    get,
    path = "/download/{report_id}/{file_index}",
    tag = "upload",
    summary = "Download an uploaded file",
    params(
        ("report_id" = String, Path, description = "Public report ID"),
        ("file_index" = usize, Path, description = "Position of the file in the report"),
    ),
    responses(
        (status = 200, description = "File contents", content_type = "application/octet-stream"),
        (status = 400, description = "Invalid file index"),
        (status = 404, description = "File not found on disk")
    )
)]
pub async fn download_file(
    Path((report_id, file_index)): Path<(String, String)>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<AxumResponse, ApiError> {
    let index = parse_file_index(&file_index)?;

    let file = state
        .service
        .download_file(identity, report_id, index)
        .await
        .map_err(ApiError::from)?;

    Ok((
        [
            (CONTENT_TYPE, file.mimetype),
            (CONTENT_DISPOSITION, attachment_header(&file.original_name)),
        ],
        file.body,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_header() {
        assert_eq!(
            attachment_header("lab \"march\".pdf"),
            "attachment; filename=\"lab 'march'.pdf\""
        );
    }
}
