//! Error-to-response mapping for the HTTP boundary.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use ripple_auth::AuthError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Boundary-level credential problems (missing or malformed
    /// Authorization header) that never reach the session core.
    #[error("{0}")]
    Unauthorized(String),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::Auth(err) => match err {
                AuthError::InvalidCredentials
                | AuthError::SessionNotFound
                | AuthError::SessionExpired => (StatusCode::UNAUTHORIZED, err.to_string()),
                AuthError::UserNotFound => (StatusCode::NOT_FOUND, err.to_string()),
                AuthError::DuplicateUsername => (StatusCode::CONFLICT, err.to_string()),
                AuthError::SelfFollow => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
                AuthError::Internal(inner) => {
                    // Log the detail server-side, return a generic message
                    tracing::error!(error = %inner, "internal server error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal server error".to_string(),
                    )
                }
            },
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}
