use axum::{
    Router, middleware,
    routing::{get, post},
};
use utoipa::OpenApi;

use crate::application::{auth::auth, http::server::app_state::AppState, rate_limit::rate_limit};

use super::handlers::{
    compare_reports::{__path_compare_reports, compare_reports},
    delete_report::{__path_delete_report, delete_report},
    export_report::{__path_export_report, export_report},
    get_report::{__path_get_report, get_report},
    list_reports::{__path_list_reports, list_reports},
    stats_overview::{__path_stats_overview, stats_overview},
    update_report::{__path_update_report, update_report},
};

#[derive(OpenApi)]
#[openapi(paths(
    list_reports,
    stats_overview,
    compare_reports,
    get_report,
    update_report,
    delete_report,
    export_report
))]
pub struct ReportApiDoc;

pub fn report_routes(state: AppState) -> Router<AppState> {
    let root_path = &state.args.server.root_path;

    Router::new()
        .route(&format!("{root_path}/reports"), get(list_reports))
        .route(
            &format!("{root_path}/reports/stats/overview"),
            get(stats_overview),
        )
        .route(&format!("{root_path}/reports/compare"), post(compare_reports))
        .route(
            &format!("{root_path}/reports/{{report_id}}"),
            get(get_report).put(update_report).delete(delete_report),
        )
        .route(
            &format!("{root_path}/reports/{{report_id}}/export"),
            get(export_report),
        )
        .layer(middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            rate_limit,
        ))
        .layer(middleware::from_fn_with_state(state.clone(), auth))
}
