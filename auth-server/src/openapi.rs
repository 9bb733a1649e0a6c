use utoipa::OpenApi;

pub(crate) const HEALTH_TAG: &str = "Health API";
pub(crate) const AUTH_TAG: &str = "Authorization API";

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::health::health_check,
        crate::api::auth::auth_request,
        crate::api::auth::validate,
    ),
    tags(
        (name = HEALTH_TAG, description = "Health check endpoints"),
        (name = AUTH_TAG, description = "Session authorization endpoints"),
    ),
    info(
        title = "Civo auth server",
        description = "Authorization enrichment for Civo OAuth sessions",
        version = "0.1.0"
    )
)]
pub(crate) struct ApiDoc;
