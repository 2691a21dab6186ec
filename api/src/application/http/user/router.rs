use axum::{
    Router, middleware,
    routing::{delete, get, put},
};
use utoipa::OpenApi;

use crate::application::{auth::auth, http::server::app_state::AppState, rate_limit::rate_limit};

use super::handlers::{
    delete_account::{__path_delete_account, delete_account},
    export_data::{__path_export_data, export_data},
    get_dashboard::{__path_get_dashboard, get_dashboard},
    get_profile::{__path_get_profile, get_profile},
    get_trends::{__path_get_trends, get_trends},
    update_preferences::{__path_update_preferences, update_preferences},
    update_profile::{__path_update_profile, update_profile},
};

#[derive(OpenApi)]
#[openapi(paths(
    get_profile,
    update_profile,
    get_dashboard,
    update_preferences,
    get_trends,
    delete_account,
    export_data
))]
pub struct UserApiDoc;

pub fn user_routes(state: AppState) -> Router<AppState> {
    let root_path = &state.args.server.root_path;

    Router::new()
        .route(
            &format!("{root_path}/user/profile"),
            get(get_profile).put(update_profile),
        )
        .route(&format!("{root_path}/user/dashboard"), get(get_dashboard))
        .route(
            &format!("{root_path}/user/preferences"),
            put(update_preferences),
        )
        .route(&format!("{root_path}/user/trends"), get(get_trends))
        .route(&format!("{root_path}/user/account"), delete(delete_account))
        .route(&format!("{root_path}/user/export"), get(export_data))
        .layer(middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            rate_limit,
        ))
        .layer(middleware::from_fn_with_state(state.clone(), auth))
}
