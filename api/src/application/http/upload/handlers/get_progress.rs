use axum::{
    Extension,
    extract::{Path, State},
};
use pearl_core::domain::{
    authentication::value_objects::Identity,
    storage::{ports::UploadService, value_objects::UploadProgress},
};

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

#[utoipa::path(
    get,
    path = "/progress/{report_id}",
    tag = "upload",
    summary = "Processing progress",
    params(("report_id" = String, Path, description = "Public report ID")),
    responses(
        (status = 200, body = UploadProgress),
        (status = 404, description = "Report not found")
    )
)]
pub async fn get_progress(
    Path(report_id): Path<String>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Response<UploadProgress>, ApiError> {
    let progress = state
        .service
        .get_progress(identity, report_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(progress))
}
