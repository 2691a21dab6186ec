use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use utoipa::OpenApi;

use crate::application::{auth::auth, http::server::app_state::AppState, rate_limit::rate_limit};

use super::handlers::{
    delete_account::{__path_delete_account, delete_account},
    google_auth::{__path_google_auth, google_auth},
    logout::{__path_logout, logout},
    me::{__path_me, me},
    refresh_token::{__path_refresh_token, refresh_token},
    verify::{__path_verify, verify},
};

#[derive(OpenApi)]
#[openapi(paths(google_auth, refresh_token, logout, verify, me, delete_account))]
pub struct AuthenticationApiDoc;

pub fn authentication_routes(state: AppState) -> Router<AppState> {
    let root_path = &state.args.server.root_path;

    let public = Router::new()
        .route(&format!("{root_path}/auth/google"), post(google_auth))
        .route(&format!("{root_path}/auth/refresh"), post(refresh_token));

    let protected = Router::new()
        .route(&format!("{root_path}/auth/logout"), post(logout))
        .route(&format!("{root_path}/auth/verify"), get(verify))
        .route(&format!("{root_path}/auth/me"), get(me))
        .route(&format!("{root_path}/auth/account"), delete(delete_account))
        .layer(middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            rate_limit,
        ))
        .layer(middleware::from_fn_with_state(state.clone(), auth));

    public.merge(protected)
}
