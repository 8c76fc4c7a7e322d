//! Server state
//!
//! [`ServerState`] holds the shared service handles: configuration, the
//! embedded database, the JWT service and the rate limiter. Cloning is
//! cheap (Arc-backed); every handler receives a clone through axum's
//! `State` extractor, never through globals.

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::core::config::DatabaseConfig;
use crate::db::DbService;
use crate::db::models::{Role, UserCreate};
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResult, RateLimiter};

/// Shared handle to every service the request handlers need
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub jwt_service: Arc<JwtService>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl ServerState {
    /// Initialize the server state
    ///
    /// Creates the working directory structure (persistent profile only),
    /// opens the database, and seeds the admin account when configured.
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        if matches!(config.database, DatabaseConfig::RocksDb(_)) {
            std::fs::create_dir_all(config.uploads_dir())
                .map_err(|e| AppError::internal(format!("Failed to create work dir: {e}")))?;
        }

        let db_service = DbService::open(&config.database).await?;

        let state = Self {
            config: config.clone(),
            db: db_service.db,
            jwt_service: Arc::new(JwtService::with_config(config.jwt.clone())),
            rate_limiter: Arc::new(RateLimiter::new(
                config.rate_limit_max,
                config.rate_limit_window_secs,
            )),
        };

        state.seed_admin().await?;

        Ok(state)
    }

    /// Create the bootstrap admin account from ADMIN_USERNAME /
    /// ADMIN_PASSWORD when it does not exist yet
    async fn seed_admin(&self) -> AppResult<()> {
        let (Ok(username), Ok(password)) = (
            std::env::var("ADMIN_USERNAME"),
            std::env::var("ADMIN_PASSWORD"),
        ) else {
            return Ok(());
        };

        let repo = UserRepository::new(self.db.clone());
        if repo
            .find_by_username(&username)
            .await
            .map_err(AppError::from)?
            .is_some()
        {
            return Ok(());
        }

        let email = std::env::var("ADMIN_EMAIL")
            .unwrap_or_else(|_| format!("{}@tajbyhand.local", username));
        repo.create(UserCreate {
            username: username.clone(),
            email,
            password,
            role: Role::Admin,
            assigned_hotels: vec![],
        })
        .await
        .map_err(AppError::from)?;

        tracing::info!(username = %username, "Seeded bootstrap admin account");
        Ok(())
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
