//! Storyframe — API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use storyframe_core::error::StoryboardError;
use thiserror::Error;
use tracing::error;

/// Message returned for every failure the caller cannot correct.
pub const INTERNAL_MESSAGE: &str = "Unable to generate storyboard";

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable or tuning file is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The tracing or OpenTelemetry pipeline could not be installed.
    #[error("telemetry error: {0}")]
    Telemetry(String),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `StoryboardError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub StoryboardError);

impl From<StoryboardError> for ApiError {
    fn from(err: StoryboardError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self.0 {
            StoryboardError::EmptyInput => {
                (StatusCode::BAD_REQUEST, "empty_input", self.0.to_string())
            }
            StoryboardError::Validation(_) => {
                (StatusCode::BAD_REQUEST, "validation_error", self.0.to_string())
            }
            other => {
                error!(error = %other, "storyboard generation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    INTERNAL_MESSAGE.to_owned(),
                )
            }
        };

        let body = ErrorBody {
            error: error_code,
            message,
        };

        (status, Json(body)).into_response()
    }
}
