use axum::{
    Extension,
    extract::{Query, State},
};
use pearl_core::domain::{
    authentication::value_objects::Identity,
    report::{entities::Report, ports::ReportService, value_objects::ReportPage},
};
use validator::Validate;

use crate::application::http::{
    report::validators::ListReportsQuery,
    server::{
        api_entities::{api_error::ApiError, response::Response},
        app_state::AppState,
    },
};

#[utoipa::path(
    get,
    path = "",
    tag = "reports",
    summary = "List reports",
    description = "Paginated list of the caller's reports with optional status filter and search over title, description and tags.",
    params(ListReportsQuery),
    responses(
        (status = 200, body = ReportPage<Report>),
        (status = 400, description = "Invalid query parameters")
    )
)]
pub async fn list_reports(
    Query(query): Query<ListReportsQuery>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Response<ReportPage<Report>>, ApiError> {
    query.validate()?;

    let page = state
        .service
        .list_reports(identity, query.into())
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(page))
}
