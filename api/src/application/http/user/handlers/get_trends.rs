use axum::{
    Extension,
    extract::{Query, State},
};
use pearl_core::domain::{
    authentication::value_objects::Identity,
    report::value_objects::Period,
    user::{ports::UserService, value_objects::TrendsOverview},
};

use crate::application::http::{
    server::{
        api_entities::{api_error::ApiError, response::Response},
        app_state::AppState,
    },
    user::validators::TrendsQuery,
};

#[utoipa::path(
    get,
    path = "/trends",
    tag = "user",
    summary = "Hormone trends over a period",
    params(TrendsQuery),
    responses((status = 200, body = TrendsOverview))
)]
pub async fn get_trends(
    Query(query): Query<TrendsQuery>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Response<TrendsOverview>, ApiError> {
    let hormone = query.hormone.filter(|h| !h.trim().is_empty());

    let trends = state
        .service
        .get_trends(identity, Period::parse(query.period.as_deref()), hormone)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(trends))
}
