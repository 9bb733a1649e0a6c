use crate::errors::ApiError;
use crate::openapi::AUTH_TAG;
use crate::state::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use civo_provider::SessionState;
use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use log::debug;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub(crate) const USER_HEADER: &str = "x-auth-request-user";
pub(crate) const EMAIL_HEADER: &str = "x-auth-request-email";
pub(crate) const GROUPS_HEADER: &str = "x-auth-request-groups";

/// Attributes of an authorized session
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct AuthResponse {
    /// Civo user id
    pub user: String,
    pub email: String,
    /// Granted team or account
    pub groups: Vec<String>,
}

impl From<SessionState> for AuthResponse {
    fn from(session: SessionState) -> Self {
        Self {
            user: session.user,
            email: session.email,
            groups: session.groups,
        }
    }
}

/// Response type for the validate endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct ValidateResponse {
    pub valid: bool,
}

/// Authorizes the bearer token of the request and returns the enriched session
#[utoipa::path(
    get,
    path = "/oauth2/auth",
    tag = AUTH_TAG,
    params(
        ("Authorization" = String, Header, description = "Bearer access token"),
    ),
    responses(
        (status = 202, description = "Session is authorized", body = AuthResponse),
        (status = 401, description = "Missing access token"),
        (status = 403, description = "User is not allowed"),
        (status = 500, description = "Provider misconfiguration"),
        (status = 502, description = "Identity provider request failed")
    )
)]
pub(crate) async fn auth_request(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let mut session = SessionState::new(bearer_token(&headers));
    state
        .provider
        .enrich_session(&state.request_context(), &mut session)
        .await?;
    debug!("Authorized user {}", session.user);

    let mut response_headers = HeaderMap::new();
    response_headers.insert(
        HeaderName::from_static(USER_HEADER),
        header_value(&session.user)?,
    );
    response_headers.insert(
        HeaderName::from_static(EMAIL_HEADER),
        header_value(&session.email)?,
    );
    response_headers.insert(
        HeaderName::from_static(GROUPS_HEADER),
        header_value(&session.groups.join(","))?,
    );

    Ok((
        StatusCode::ACCEPTED,
        response_headers,
        Json(AuthResponse::from(session)),
    )
        .into_response())
}

/// Checks whether the bearer token is still accepted by the identity provider
#[utoipa::path(
    get,
    path = "/oauth2/validate",
    tag = AUTH_TAG,
    params(
        ("Authorization" = String, Header, description = "Bearer access token"),
    ),
    responses(
        (status = 200, description = "Token is valid", body = ValidateResponse),
        (status = 401, description = "Token is missing or rejected", body = ValidateResponse)
    )
)]
pub(crate) async fn validate(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> (StatusCode, Json<ValidateResponse>) {
    let session = SessionState::new(bearer_token(&headers));
    let valid = state
        .provider
        .validate_session(&state.request_context(), &session)
        .await;

    let status = if valid {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    };
    (status, Json(ValidateResponse { valid }))
}

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/oauth2/auth", get(auth_request))
        .route("/oauth2/validate", get(validate))
}

/// Token of a `Bearer` authorization header, empty when there is none.
///
/// The scheme name is matched case-insensitively.
fn bearer_token(headers: &HeaderMap) -> &str {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .unwrap_or("")
}

fn header_value(value: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(value)
        .map_err(|e| ApiError::internal(format!("invalid response header value: {e}")))
}
