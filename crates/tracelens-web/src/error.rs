//! HTTP error responses.
//!
//! Every error renders as `{"error": "<message>"}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracelens_core::CoreError;
use tracing::error;

const GENERIC_MESSAGE: &str = "Internal server error";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("URL is required")]
    MissingUrl,

    #[error("{0}")]
    Internal(String),
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MissingUrl => Self::MissingUrl,
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MissingUrl => (StatusCode::BAD_REQUEST, self.to_string()),
            Self::Internal(message) => {
                error!(error = %message, "Analysis failed");
                let message = if message.trim().is_empty() {
                    GENERIC_MESSAGE.to_string()
                } else {
                    message
                };
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
