use crate::{
    error::AppError,
    models::{ShortenRequest, ShortenResponse},
    AppState,
};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

/// GET /links
/// The full mapping as one JSON object.
pub async fn list(State(state): State<Arc<AppState>>) -> Response {
    match state.store.load().await {
        Ok(links) => Json(links).into_response(),
        Err(e) => {
            tracing::error!("Failed to load links: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
        }
    }
}

/// POST /shorten
///
/// The body is parsed by hand rather than through `Json<T>` so that a
/// malformed body maps onto the generic 500 and no `Content-Type` is required.
/// Its size is capped by the router's `DefaultBodyLimit`.
///
/// Valid JSON that is not an object (`[]`, `123`, ...) has no `url` and gets
/// the 400; only `null` joins the malformed bodies.
pub async fn shorten(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ShortenResponse>, AppError> {
    let request = ShortenRequest::from_value(serde_json::from_slice(&body)?)?;

    let url = request
        .url
        .filter(|u| !u.is_empty())
        .ok_or(AppError::UrlRequired)?;

    // An empty shortCode means "generate one for me".
    let requested_code = request.short_code.as_deref().filter(|c| !c.is_empty());

    let link = state.store.insert_new(&url, requested_code).await?;
    tracing::info!("Created link {} -> {}", link.short_code, link.original_url);

    Ok(Json(ShortenResponse {
        success: true,
        short_url: state.config.short_url(&link.short_code),
        original_url: link.original_url,
        short_code: link.short_code,
    }))
}
