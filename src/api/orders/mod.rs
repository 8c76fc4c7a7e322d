//! Order API module

pub mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, patch, post},
};

use crate::auth::{permissions, require_admin, require_permission};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(
        "/api/orders",
        placement_routes()
            .merge(read_routes())
            .merge(manage_routes())
            .merge(admin_routes()),
    )
}

/// Public: the storefront's order → WhatsApp handoff
fn placement_routes() -> Router<ServerState> {
    Router::new().route("/", post(handler::place))
}

/// Any authenticated role; hotel_viewer results are scoped
fn read_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/stats/summary", get(handler::stats_summary))
        .route("/{id}", get(handler::get_by_id))
}

/// Status transitions, admin and operator
fn manage_routes() -> Router<ServerState> {
    Router::new()
        .route("/{id}/status", patch(handler::update_status))
        .layer(middleware::from_fn(require_permission(
            permissions::ORDERS_MANAGE,
        )))
}

/// Hard deletion, admin only
fn admin_routes() -> Router<ServerState> {
    Router::new()
        .route("/{id}", delete(handler::delete_order))
        .layer(middleware::from_fn(require_admin))
}
