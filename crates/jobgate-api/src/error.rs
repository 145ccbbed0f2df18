//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use jobgate_engine::EngineError;
use jobgate_models::PayloadError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API access token is not configured")]
    Misconfigured,

    #[error("Authorization header missing")]
    MissingAuthorization,

    #[error("Authorization header is not a bearer token")]
    MalformedAuthorization,

    #[error("Invalid access token")]
    InvalidToken,

    #[error("Invalid request: {0}")]
    InvalidPayload(#[from] PayloadError),

    #[error("{0}")]
    Engine(#[from] EngineError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Misconfigured | ApiError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MissingAuthorization | ApiError::MalformedAuthorization => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::InvalidToken => StatusCode::FORBIDDEN,
            ApiError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn body(&self) -> ErrorResponse {
        let (error, message) = match self {
            ApiError::Misconfigured => (
                "Server configuration error",
                "API access token is not configured",
            ),
            ApiError::MissingAuthorization => (
                "Authorization header required",
                "Please provide an access token in the Authorization header",
            ),
            ApiError::MalformedAuthorization => (
                "Invalid authorization format",
                "Authorization header should be in format: Bearer <token>",
            ),
            ApiError::InvalidToken => (
                "Invalid access token",
                "The provided access token is not valid",
            ),
            ApiError::InvalidPayload(_) => (
                "Invalid request",
                "Request body must be JSON with scraping parameters",
            ),
            // Engine failures are passed through verbatim.
            ApiError::Engine(e) => {
                return ErrorResponse {
                    success: Some(false),
                    error: e.to_string(),
                    message: "Failed to scrape jobs".to_string(),
                }
            }
        };

        ErrorResponse {
            success: None,
            error: error.to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    success: Option<bool>,
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}
