use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Remote/model failures never appear here: they are absorbed into fallback
/// output at the call site. The only remote-related variant is
/// `RemoteUnavailable`, used by endpoints that have no meaning without a
/// confirmed remote model (e.g. the model listing proxy).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Remote generation is not configured: {0}")]
    RemoteUnavailable(String),

    #[error("Model listing failed: {0}")]
    ModelListing(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::RemoteUnavailable(msg) => (
                StatusCode::BAD_REQUEST,
                "REMOTE_UNAVAILABLE",
                msg.clone(),
            ),
            AppError::ModelListing(msg) => {
                tracing::error!("Model listing error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "MODEL_LISTING_ERROR",
                    msg.clone(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Failed to generate paragraph.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
