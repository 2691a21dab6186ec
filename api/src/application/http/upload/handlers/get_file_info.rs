use axum::{
    Extension,
    extract::{Path, State},
};
use pearl_core::domain::{
    authentication::value_objects::Identity,
    storage::{ports::UploadService, value_objects::FileInfo},
};

use crate::application::http::{
    server::{
        api_entities::{api_error::ApiError, response::Response},
        app_state::AppState,
    },
    upload::validators::parse_file_index,
};

#[utoipa::path(
    get,
    path = "/file/{report_id}/{file_index}",
    tag = "upload",
    summary = "File details",
    params(
        ("report_id" = String, Path, description = "Public report ID"),
        ("file_index" = usize, Path, description = "Position of the file in the report"),
    ),
    responses(
        (status = 200, body = FileInfo),
        (status = 400, description = "Invalid file index"),
        (status = 404, description = "Report not found")
    )
)]
pub async fn get_file_info(
    Path((report_id, file_index)): Path<(String, String)>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Response<FileInfo>, ApiError> {
    let index = parse_file_index(&file_index)?;

    let info = state
        .service
        .get_file_info(identity, report_id, index)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(info.with_root(&state.args.server.root_path)))
}
