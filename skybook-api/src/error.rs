use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use skybook_authoring::AuthoringError;
use skybook_core::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Cannot exceed {ceiling} seats limit")]
    Ceiling { ceiling: u32, requested: u32 },

    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::Ceiling { ceiling, requested } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "warning": self.to_string(),
                    "ceiling": ceiling,
                    "requested": requested,
                }),
            ),
            AppError::Upstream(msg) => {
                tracing::warn!("Backend call failed: {}", msg);
                (StatusCode::BAD_GATEWAY, json!({ "error": msg }))
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal Server Error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => AppError::Validation(msg),
            CoreError::NotFound(msg) => AppError::NotFound(msg),
            CoreError::Upstream(msg) => AppError::Upstream(msg),
            CoreError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<AuthoringError> for AppError {
    fn from(err: AuthoringError) -> Self {
        match err {
            AuthoringError::CeilingExceeded { ceiling, requested } => {
                AppError::Ceiling { ceiling, requested }
            }
            other => AppError::Validation(other.to_string()),
        }
    }
}
