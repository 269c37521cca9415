pub mod assets;
pub mod links;
pub mod redirect;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Body of every 404 for an unknown short code or unrouted request.
pub const NOT_FOUND_MESSAGE: &str = "Page not found pls enter a valid link";

/// Catch-all for method/path pairs no route answers.
pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE).into_response()
}
