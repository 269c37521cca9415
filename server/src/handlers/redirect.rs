use crate::{handlers, AppState};
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// GET /:code
///
/// 1. Reload the whole mapping from disk (there is no cross-request cache).
/// 2. Known code → 302 with `Location` set to the original URL.
/// 3. Unknown code → 404 with the fixed not-found message.
///
/// The lookup key is the decoded path segment; a query string is not part of
/// it. A segment that does not decode to UTF-8 can't be a stored code, so it
/// is a 404 as well.
pub async fn redirect(
    State(state): State<Arc<AppState>>,
    code: Result<Path<String>, PathRejection>,
) -> Response {
    match code {
        Ok(Path(code)) => resolve(&state, &code).await,
        Err(e) => {
            tracing::debug!("Undecodable short code path: {}", e);
            handlers::not_found().await
        }
    }
}

/// GET /shorten
///
/// `/shorten` is only special for POST; a GET is looked up like any other code.
pub async fn redirect_shorten(State(state): State<Arc<AppState>>) -> Response {
    resolve(&state, "shorten").await
}

async fn resolve(state: &AppState, code: &str) -> Response {
    let links = match state.store.load().await {
        Ok(links) => links,
        Err(e) => {
            tracing::error!("Failed to load links for short code '{}': {}", code, e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response();
        }
    };

    let Some(original_url) = links.get(code) else {
        tracing::debug!("Unknown short code '{}'", code);
        return handlers::not_found().await;
    };

    match HeaderValue::from_bytes(original_url.as_bytes()) {
        Ok(location) => (StatusCode::FOUND, [(header::LOCATION, location)]).into_response(),
        Err(_) => {
            tracing::error!(
                "Short code '{}' maps to a URL that is not a valid header value",
                code
            );
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
        }
    }
}
