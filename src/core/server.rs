//! Server Implementation
//!
//! Router assembly, middleware stack and the serve loop.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::auth;
use crate::core::{Config, ServerState};
use crate::utils::AppResult;

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    /// Assemble the router with the full middleware stack
    ///
    /// Layer order (outermost first at runtime): CORS, trace, timeout,
    /// then JWT authentication; role checks sit on the individual route
    /// groups inside the api modules.
    pub fn build_router(state: ServerState) -> Router {
        Router::new()
            .merge(api::health::router())
            .merge(api::auth::router())
            .merge(api::products::router())
            .merge(api::hotels::router())
            .merge(api::orders::router())
            .merge(api::reports::router())
            .merge(api::upload::router())
            .nest_service(
                "/uploads",
                ServeDir::new(state.config.uploads_dir()),
            )
            .layer(middleware::from_fn_with_state(
                state.clone(),
                auth::require_auth,
            ))
            .layer(TimeoutLayer::new(Duration::from_millis(
                state.config.request_timeout_ms,
            )))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    pub async fn run(&self) -> AppResult<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        let app = Self::build_router(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("TajByHand server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| crate::utils::AppError::internal(format!("Failed to bind {addr}: {e}")))?;

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        })
        .await
        .map_err(|e| crate::utils::AppError::internal(format!("Server error: {e}")))?;

        Ok(())
    }
}
