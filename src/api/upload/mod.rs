//! Upload API module

pub mod handler;

use axum::{Router, extract::DefaultBodyLimit, middleware, routing::post};

use crate::auth::{permissions, require_permission};
use crate::core::ServerState;

/// Request body cap: the 5MB image plus multipart framing
const UPLOAD_BODY_LIMIT: usize = 6 * 1024 * 1024;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/upload", post(handler::upload))
        .layer(middleware::from_fn(require_permission(
            permissions::PRODUCTS_MANAGE,
        )))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
}
