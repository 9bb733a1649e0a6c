use axum::response::IntoResponse;
use axum::Json;
use civo_provider::ProviderError;
use http::StatusCode;
use log::{error, warn};
use serde_json::json;

#[derive(Debug, Clone)]
pub struct ApiError {
    pub detail: String,
    pub status_code: StatusCode,
}

impl ApiError {
    /// Create a new ApiError with a detail message and status code
    pub fn new<S: ToString>(detail: S, status_code: StatusCode) -> Self {
        Self {
            detail: detail.to_string(),
            status_code,
        }
    }

    /// Create new Internal Server Error (500) with a detail message
    pub fn internal<S: ToString>(detail: S) -> Self {
        Self::new(detail, StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.status_code;
        let body = json!({
            "detail": self.detail,
        });
        (status_code, Json(body)).into_response()
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        let status_code = match err {
            ProviderError::MissingCredential => StatusCode::UNAUTHORIZED,
            ProviderError::AccessDenied(_) => StatusCode::FORBIDDEN,
            ProviderError::Transport(_) | ProviderError::MalformedResponse(_) => {
                StatusCode::BAD_GATEWAY
            }
            ProviderError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status_code.is_server_error() {
            error!("Authorization failed: {}", err);
        } else {
            warn!("Authorization rejected: {}", err);
        }
        Self::new(err, status_code)
    }
}
