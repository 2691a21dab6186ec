use axum::{
    Extension,
    extract::{Path, State},
};
use pearl_core::domain::{authentication::value_objects::Identity, storage::ports::UploadService};
use tracing::info;

use crate::application::http::{
    server::{
        api_entities::{api_error::ApiError, response::Response},
        app_state::AppState,
    },
    upload::validators::parse_file_index,
};

#[utoipa::path(
    delete,
    path = "/file/{report_id}/{file_index}",
    tag = "upload",
    summary = "Remove a file from a report",
    params(
        ("report_id" = String, Path, description = "Public report ID"),
        ("file_index" = usize, Path, description = "Position of the file in the report"),
    ),
    responses(
        (status = 200, description = "File deleted successfully"),
        (status = 400, description = "Invalid file index"),
        (status = 404, description = "Report not found")
    )
)]
pub async fn delete_file(
    Path((report_id, file_index)): Path<(String, String)>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Response<()>, ApiError> {
    let index = parse_file_index(&file_index)?;

    state
        .service
        .delete_file(identity, report_id.clone(), index)
        .await
        .map_err(ApiError::from)?;

    info!(report_id = %report_id, index, "file removed from report");
    Ok(Response::Message("File deleted successfully".to_string()))
}
