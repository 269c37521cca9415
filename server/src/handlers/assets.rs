use crate::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::{path::Path, sync::Arc};

/// GET /
pub async fn index(State(state): State<Arc<AppState>>) -> Response {
    serve_file(
        &state.config.static_dir.join("index.html"),
        "text/html; charset=utf-8",
    )
    .await
}

/// GET /style.css
pub async fn stylesheet(State(state): State<Arc<AppState>>) -> Response {
    serve_file(
        &state.config.static_dir.join("style.css"),
        "text/css; charset=utf-8",
    )
    .await
}

/// Send the file verbatim, or a plain-text 404 if it can't be read.
async fn serve_file(path: &Path, content_type: &'static str) -> Response {
    match tokio::fs::read(path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type)], bytes).into_response(),
        Err(e) => {
            tracing::warn!("Static asset {} unavailable: {}", path.display(), e);
            (StatusCode::NOT_FOUND, "404 page not found").into_response()
        }
    }
}
