use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Failures reported at the HTTP level instead of inside a JSON-RPC envelope.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {message}")]
    MissingCredential {
        code: &'static str,
        message: &'static str,
    },
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
}

impl AppError {
    pub fn missing_credential() -> Self {
        Self::MissingCredential {
            code: "missing_credential",
            message: "backend credential is not configured",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::MissingCredential { code, message } => {
                tracing::error!(code = %code, "request rejected before dispatch: {message}");
                (StatusCode::INTERNAL_SERVER_ERROR, code, message)
            }
        };

        (
            status,
            Json(ErrorResponse {
                code: code.to_string(),
                message: message.to_string(),
                details: json!({}),
            }),
        )
            .into_response()
    }
}
