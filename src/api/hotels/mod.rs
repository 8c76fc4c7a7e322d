//! Hotel API module

pub mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(
        "/api/hotels",
        public_routes().merge(stats_routes()).merge(admin_routes()),
    )
}

/// Storefront personalization read
fn public_routes() -> Router<ServerState> {
    Router::new().route("/{slug}", get(handler::get_by_slug))
}

/// Authenticated, scope checked in the handler
fn stats_routes() -> Router<ServerState> {
    Router::new().route("/{slug}/stats", get(handler::stats))
}

/// Registry management, admin only
fn admin_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{slug}", put(handler::update).delete(handler::delete))
        .route("/{slug}/qr", get(handler::qr))
        .layer(middleware::from_fn(require_admin))
}
