use axum::{
    Extension,
    extract::{Path, Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response as AxumResponse},
};
use pearl_core::domain::{
    authentication::value_objects::Identity,
    report::{ports::ReportService, value_objects::ExportFormat},
};

use crate::application::http::{
    report::validators::ExportQuery,
    server::{api_entities::api_error::ApiError, app_state::AppState},
    upload::handlers::download_file::attachment_header,
};

#[utoipa::path(
    get,
    path = "/{report_id}/export",
    tag = "reports",
    summary = "Export a report as JSON or CSV",
    params(
        ("report_id" = String, Path, description = "Public report ID"),
        ExportQuery,
    ),
    responses(
        (status = 200, description = "Export attachment"),
        (status = 404, description = "Report not found")
    )
)]
pub async fn export_report(
    Path(report_id): Path<String>,
    Query(query): Query<ExportQuery>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<AxumResponse, ApiError> {
    let file = state
        .service
        .export_report(identity, report_id, ExportFormat::parse(query.format.as_deref()))
        .await
        .map_err(ApiError::from)?;

    Ok((
        [
            (CONTENT_TYPE, file.content_type.to_string()),
            (CONTENT_DISPOSITION, attachment_header(&file.filename)),
        ],
        file.body,
    )
        .into_response())
}
