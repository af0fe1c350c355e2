use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Message returned for every server-side failure. The cause is only logged.
pub const GENERIC_FAILURE: &str = "Failed to generate speech. Please check the server logs.";

#[derive(thiserror::Error, Debug, Clone)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unexpected provider response: {0}")]
    UpstreamProtocol(String),

    #[error("Provider unreachable: {0}")]
    Network(String),

    #[error("Provider returned {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "VALIDATION_ERROR",
            AppError::UpstreamProtocol(_) => "UPSTREAM_PROTOCOL_ERROR",
            AppError::Network(_) => "NETWORK_ERROR",
            AppError::Provider { .. } => "PROVIDER_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Internal(_) => "UNKNOWN_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, message) = match &self {
            AppError::BadRequest(msg) => {
                tracing::warn!("Rejected request: {} - {}", code, msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            _ => {
                tracing::error!("Request failed: {} - {}", code, self);
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE.to_string())
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: message,
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}
