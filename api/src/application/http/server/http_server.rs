use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{
        HeaderValue, Method,
        header::{ACCEPT, AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE},
    },
    routing::get,
};
use axum_prometheus::PrometheusMetricLayer;
use pearl_core::{
    application::{PearlService, create_service},
    domain::{common::PearlConfig, report::ports::ReportService},
};
use tower_http::cors::CorsLayer;
use tracing::{debug, error, info, info_span, warn};
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;
use utoipa_redoc::{Redoc, Servable};
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    application::{
        http::{
            analysis::router::analysis_routes,
            authentication::router::authentication_routes,
            health::router::health_routes,
            report::router::report_routes,
            server::{app_state::AppState, openapi::ApiDoc},
            upload::router::upload_routes,
            user::router::user_routes,
        },
        rate_limit::RateLimiter,
    },
    args::Args,
};

const CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);
const FAILED_REPORT_MAX_AGE_DAYS: i64 = 7;

pub async fn state(args: Arc<Args>) -> Result<AppState, anyhow::Error> {
    let config = PearlConfig::from(args.as_ref().clone());
    let service = create_service(config).await?;

    let rate_limiter = RateLimiter::new(
        args.auth.rate_limit_max,
        Duration::from_secs(args.auth.rate_limit_window_secs),
    );

    Ok(AppState::new(args, service, rate_limiter))
}

/// Deletes reports stuck in `error` once an hour for the lifetime of the process.
pub fn spawn_cleanup_task(service: PearlService) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CLEANUP_INTERVAL);

        loop {
            interval.tick().await;

            match service
                .cleanup_failed_reports(FAILED_REPORT_MAX_AGE_DAYS)
                .await
            {
                Ok(0) => debug!("no failed reports to clean up"),
                Ok(count) => info!(count, "cleaned up failed reports"),
                Err(e) => error!("failed report cleanup failed: {}", e),
            }
        }
    });
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect::<Vec<HeaderValue>>();

    debug!("Allowed origins: {:?}", origins);

    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_origin(origins)
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, CONTENT_LENGTH, ACCEPT])
        .expose_headers([CONTENT_DISPOSITION])
        .allow_credentials(true)
}

///  Returns the [`Router`] of this application.
pub fn router(state: AppState) -> Result<Router, anyhow::Error> {
    let trace_layer = tower_http::trace::TraceLayer::new_for_http().make_span_with(
        |request: &axum::extract::Request| {
            let uri: String = request.uri().to_string();
            info_span!("http_request", method = ?request.method(), uri)
        },
    );

    let cors = cors_layer(&state.args.server.allowed_origins);
    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

    let root_path = state.args.server.root_path.clone();

    let mut openapi = ApiDoc::openapi();
    openapi.paths.paths = openapi
        .paths
        .paths
        .into_iter()
        .map(|(path, item)| (format!("{root_path}{path}"), item))
        .collect();

    let api_docs_url = format!("{root_path}/api-docs/openapi.json");

    let router = Router::new()
        .merge(Scalar::with_url(format!("{root_path}/scalar"), openapi.clone()))
        .merge(
            SwaggerUi::new(format!("{root_path}/swagger-ui"))
                .url(api_docs_url.clone(), openapi.clone()),
        )
        .merge(Redoc::with_url(format!("{root_path}/redoc"), openapi))
        .merge(RapiDoc::new(api_docs_url).path(format!("{root_path}/rapidoc")))
        .merge(authentication_routes(state.clone()))
        .merge(upload_routes(state.clone()))
        .merge(analysis_routes(state.clone()))
        .merge(report_routes(state.clone()))
        .merge(user_routes(state.clone()))
        .merge(health_routes(&root_path))
        .route(
            &format!("{root_path}/metrics"),
            get(|| async move { metric_handle.render() }),
        )
        .layer(trace_layer)
        .layer(cors)
        .layer(prometheus_layer)
        .with_state(state);

    Ok(router)
}
