//! API endpoints.

mod votes;

use axum::{Json, Router, http::StatusCode, response::IntoResponse};

use crate::{middleware::AppState, response::ApiResponse};

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/votes", votes::router())
        .fallback(not_found)
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::err("NOT_FOUND", "No such endpoint")),
    )
}
