use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use scamguard_ai::AiError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Request-level failure. Every variant renders as `{"error": ...}` JSON;
/// quota denials additionally carry `"limit_reached": true` so the client
/// can show the upgrade prompt instead of a generic error.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    QuotaExceeded(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Upstream(#[from] AiError),

    #[error("Internal server error")]
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) | ApiError::QuotaExceeded(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(AiError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            ApiError::QuotaExceeded(msg) => json!({ "error": msg, "limit_reached": true }),
            // Upstream and internal detail goes to the log; the client gets
            // a stable phrase.
            ApiError::Upstream(err) => {
                error!("Classifier failure: {}", err);
                let msg = match err {
                    AiError::Unavailable(_) => {
                        "Analysis service is temporarily unavailable. Please try again."
                    }
                    AiError::Unparseable(_) => "Failed to parse AI response",
                    AiError::Api(_) => "Analysis failed. Please try again.",
                };
                json!({ "error": msg })
            }
            ApiError::Internal(err) => {
                error!("Internal error serving request: {:#}", err);
                json!({ "error": "Internal server error" })
            }
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
