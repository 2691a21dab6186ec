use crate::application::http::{
    analysis::router::AnalysisApiDoc, authentication::router::AuthenticationApiDoc,
    health::router::HealthApiDoc, report::router::ReportApiDoc, upload::router::UploadApiDoc,
    user::router::UserApiDoc,
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pearl API",
        description = "Hormone report upload, analysis and tracking"
    ),
    modifiers(&BearerAuth),
    security(("bearer" = [])),
    nest(
        (path = "/auth", api = AuthenticationApiDoc),
        (path = "/upload", api = UploadApiDoc),
        (path = "/analysis", api = AnalysisApiDoc),
        (path = "/reports", api = ReportApiDoc),
        (path = "/user", api = UserApiDoc),
        (path = "/health", api = HealthApiDoc),
    )
)]
pub struct ApiDoc;
