use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use utoipa::OpenApi;

use crate::application::{auth::auth, http::server::app_state::AppState, rate_limit::rate_limit};

use super::handlers::{
    delete_file::{__path_delete_file, delete_file},
    download_file::{__path_download_file, download_file},
    get_file_info::{__path_get_file_info, get_file_info},
    get_progress::{__path_get_progress, get_progress},
    get_thumbnail::{__path_get_thumbnail, get_thumbnail},
    upload_report::{__path_upload_report, upload_report},
};

#[derive(OpenApi)]
#[openapi(paths(
    upload_report,
    get_progress,
    get_file_info,
    delete_file,
    download_file,
    get_thumbnail
))]
pub struct UploadApiDoc;

pub fn upload_routes(state: AppState) -> Router<AppState> {
    let root_path = &state.args.server.root_path;
    let body_limit = state.args.storage.upload_body_limit();

    Router::new()
        .route(&format!("{root_path}/upload"), post(upload_report))
        .route(
            &format!("{root_path}/upload/progress/{{report_id}}"),
            get(get_progress),
        )
        .route(
            &format!("{root_path}/upload/file/{{report_id}}/{{file_index}}"),
            get(get_file_info).delete(delete_file),
        )
        .route(
            &format!("{root_path}/upload/download/{{report_id}}/{{file_index}}"),
            get(download_file),
        )
        .route(
            &format!("{root_path}/upload/thumbnail/{{report_id}}/{{file_index}}"),
            get(get_thumbnail),
        )
        .layer(middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            rate_limit,
        ))
        .layer(middleware::from_fn_with_state(state.clone(), auth))
        .layer(DefaultBodyLimit::max(body_limit))
}
