//! Reports API module

pub mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::{permissions, require_permission};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(
        "/api/reports",
        Router::new()
            .route("/commissions", get(handler::commissions))
            .layer(middleware::from_fn(require_permission(
                permissions::REPORTS_VIEW,
            ))),
    )
}
