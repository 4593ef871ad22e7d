use crate::cache::CacheError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// The provider reported an error on the OAuth callback.
    #[error("Authorization failed: {0}")]
    UpstreamAuth(String),

    /// Missing or unparseable `code`/`state` on the callback.
    #[error("Malformed callback: {0}")]
    MalformedCallback(String),

    /// State record absent or token mismatch. Deliberately carries no detail.
    #[error("State does not match.")]
    StateMismatch,

    /// The token endpoint call failed or returned non-success.
    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    /// No credential record present for the requested (org, user).
    #[error("{0}")]
    NotFound(String),

    /// Caller-supplied credentials payload could not be used.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::UpstreamAuth(_) => (StatusCode::BAD_REQUEST, "authorization_failed"),
            AppError::MalformedCallback(_) => (StatusCode::BAD_REQUEST, "malformed_callback"),
            AppError::StateMismatch => (StatusCode::BAD_REQUEST, "state_mismatch"),
            AppError::TokenExchange(_) => (StatusCode::BAD_GATEWAY, "token_exchange_failed"),
            AppError::NotFound(_) => (StatusCode::BAD_REQUEST, "not_found"),
            AppError::InvalidCredentials(_) => (StatusCode::BAD_REQUEST, "invalid_credentials"),
            AppError::Cache(_) => (StatusCode::INTERNAL_SERVER_ERROR, "cache_error"),
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let body = Json(json!({
            "error": error,
            "message": self.to_string()
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_mismatch_leaks_no_detail() {
        let err = AppError::StateMismatch;
        assert_eq!(err.to_string(), "State does not match.");
    }

    #[test]
    fn test_display_messages() {
        let err = AppError::UpstreamAuth("access_denied".to_string());
        assert_eq!(err.to_string(), "Authorization failed: access_denied");

        let err = AppError::NotFound("No credentials found.".to_string());
        assert_eq!(err.to_string(), "No credentials found.");
    }

    #[test]
    fn test_into_response_status_codes() {
        let response = AppError::StateMismatch.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::UpstreamAuth("denied".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::TokenExchange("upstream 500".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response = AppError::NotFound("No credentials found.".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_from_cache_error() {
        let cache_err = CacheError::Connection("refused".to_string());
        let app_err: AppError = cache_err.into();
        assert!(matches!(app_err, AppError::Cache(_)));
    }
}
