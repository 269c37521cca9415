use crate::{models::ErrorBody, store::StoreError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Failures of the JSON API (`POST /shorten`).
///
/// Client mistakes are answered with their own message; everything else is
/// logged and collapsed into a generic 500.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("URL is required")]
    UrlRequired,

    #[error("Short code must be different")]
    ShortCodeTaken,

    #[error("malformed request body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::CodeTaken(_) => Self::ShortCodeTaken,
            other => Self::Store(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::UrlRequired | AppError::ShortCodeTaken => {
                json_error(StatusCode::BAD_REQUEST, &self.to_string())
            }
            AppError::MalformedBody(_) | AppError::Store(_) => {
                tracing::error!("Error: {}", self);
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

fn json_error(status: StatusCode, message: &str) -> Response {
    let body = ErrorBody {
        error: message.to_owned(),
    };
    (status, Json(body)).into_response()
}
