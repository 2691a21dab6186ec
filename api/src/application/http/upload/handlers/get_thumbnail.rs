use axum::{
    Extension,
    extract::{Path, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response as AxumResponse},
};
use pearl_core::domain::{authentication::value_objects::Identity, storage::ports::UploadService};

use crate::application::http::{
    server::{api_entities::api_error::ApiError, app_state::AppState},
    upload::validators::parse_file_index,
};

#[utoipa::path(
    get,
    path = "/thumbnail/{report_id}/{file_index}",
    tag = "upload",
    summary = "Image thumbnail",
    params(
        ("report_id" = String, Path, description = "Public report ID"),
        ("file_index" = usize, Path, description = "Position of the file in the report"),
    ),
    responses(
        (status = 200, description = "JPEG thumbnail", content_type = "image/jpeg"),
        (status = 404, description = "Thumbnail not found")
    )
)]
pub async fn get_thumbnail(
    Path((report_id, file_index)): Path<(String, String)>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<AxumResponse, ApiError> {
    let index = parse_file_index(&file_index)?;

    let body = state
        .service
        .get_thumbnail(identity, report_id, index)
        .await
        .map_err(ApiError::from)?;

    Ok(([(CONTENT_TYPE, "image/jpeg")], body).into_response())
}
