use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use dataset_store::StoreError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Dataset store error: {0}")]
    Store(#[from] StoreError),
    #[error("Analytics error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),
    #[error("Invalid input: {0}")]
    Core(#[from] core_types::CoreError),
    #[error("Malformed request body: {0}")]
    Body(#[from] JsonRejection),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Converts our custom `AppError` into an HTTP response with an `error` body.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Store(StoreError::NotFound(id)) => {
                (StatusCode::NOT_FOUND, format!("dataset {} not found", id))
            }
            AppError::Store(StoreError::ColumnNotFound(column)) => {
                (StatusCode::BAD_REQUEST, format!("column not found: {}", column))
            }
            AppError::Store(store_err @ StoreError::InvalidDataset(_)) => {
                (StatusCode::BAD_REQUEST, store_err.to_string())
            }
            AppError::Analytics(analytics_err) => {
                tracing::warn!(error = %analytics_err, "Analysis rejected.");
                (StatusCode::BAD_REQUEST, analytics_err.to_string())
            }
            AppError::Core(core_err) => (StatusCode::BAD_REQUEST, core_err.to_string()),
            AppError::Body(rejection) => (rejection.status(), rejection.body_text()),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Internal(message) => {
                tracing::error!(error = %message, "Internal error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
