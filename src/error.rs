// Error types for provider calls and the HTTP layer.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure talking to a remote LLM provider.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("{provider} credential missing: {variable} is not set")]
    MissingCredential {
        provider: &'static str,
        variable: String,
    },

    #[error("{provider} request failed: {message}")]
    Request {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} returned HTTP {status}: {message}")]
    Http {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("{provider} response could not be decoded: {message}")]
    Decode {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} returned no text")]
    EmptyResponse { provider: &'static str },
}

impl LlmError {
    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            LlmError::MissingCredential { .. } => "missing_credential",
            LlmError::Request { .. } => "request",
            LlmError::Http { .. } => "http",
            LlmError::Decode { .. } => "decode",
            LlmError::EmptyResponse { .. } => "empty",
        }
    }
}

pub type LlmResult<T> = Result<T, LlmError>;

/// Error returned from HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Llm(LlmError::MissingCredential { .. }) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Llm(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
