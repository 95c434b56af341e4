use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Router};

/// Health check
///
/// Does not touch the database, so it answers even when the store is down.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "The server is up", body = String, content_type = "text/plain")
    )
)]
pub async fn health() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        "Server is healthy",
    )
        .into_response()
}

pub fn router() -> Router {
    Router::new().route("/api/health", get(health))
}
