use axum::{
    Router, middleware,
    routing::{get, post},
};
use utoipa::OpenApi;

use crate::application::{auth::auth, http::server::app_state::AppState, rate_limit::rate_limit};

use super::handlers::{
    analyze_report::{__path_analyze_report, analyze_report},
    get_results::{__path_get_results, get_results},
    hormone_insights::{__path_hormone_insights, hormone_insights},
    reanalyze::{__path_reanalyze, reanalyze},
};

#[derive(OpenApi)]
#[openapi(paths(analyze_report, get_results, reanalyze, hormone_insights))]
pub struct AnalysisApiDoc;

pub fn analysis_routes(state: AppState) -> Router<AppState> {
    let root_path = &state.args.server.root_path;

    Router::new()
        .route(
            &format!("{root_path}/analysis/analyze/{{report_id}}"),
            post(analyze_report),
        )
        .route(
            &format!("{root_path}/analysis/results/{{report_id}}"),
            get(get_results),
        )
        .route(
            &format!("{root_path}/analysis/reanalyze/{{report_id}}"),
            post(reanalyze),
        )
        .route(
            &format!("{root_path}/analysis/insights/{{report_id}}/{{hormone_name}}"),
            get(hormone_insights),
        )
        .layer(middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            rate_limit,
        ))
        .layer(middleware::from_fn_with_state(state.clone(), auth))
}
