use crate::{
    handlers::{assets, links, not_found, redirect},
    AppState,
};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Build the application router.
///
/// Every method router carries a 404 fallback, so a known path with an
/// unsupported method gets the same answer as an unknown path instead of 405.
pub fn router(state: Arc<AppState>) -> Router {
    let max_body_bytes = state.config.max_body_bytes;

    Router::new()
        // Static front end
        .route("/", get(assets::index).fallback(not_found))
        .route("/style.css", get(assets::stylesheet).fallback(not_found))
        // JSON API
        .route("/links", get(links::list).fallback(not_found))
        .route(
            "/shorten",
            post(links::shorten)
                .get(redirect::redirect_shorten)
                .fallback(not_found),
        )
        // Short-link redirect; static routes above take priority
        .route("/:code", get(redirect::redirect).fallback(not_found))
        .fallback(not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(max_body_bytes)),
        )
}
