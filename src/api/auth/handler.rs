//! Authentication Handlers
//!
//! Login with lockout handling, and the current-session identity.

use std::time::Duration;

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Role, User};
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResult};

/// Fixed delay for authentication to blunt timing probes
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// Sanitized user payload, never carries the password hash
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub assigned_hotels: Vec<String>,
    pub last_login: Option<String>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
            username: user.username,
            email: user.email,
            role: user.role,
            assigned_hotels: user.assigned_hotels,
            last_login: user.last_login,
        }
    }
}

/// Login handler
///
/// Verifies credentials and returns a bearer token. Locked accounts are
/// rejected before password verification so the lock cannot be probed.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let username = req.username.to_lowercase();

    if !state.rate_limiter.check(&format!("login:{}", username)) {
        return Err(AppError::RateLimited);
    }

    let repo = UserRepository::new(state.get_db());
    let user = repo.find_by_username(&username).await?;

    // Fixed delay before any verdict
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let Some(user) = user else {
        tracing::warn!(username = %username, "Login failed - user not found");
        return Err(AppError::invalid_credentials());
    };

    if !user.is_active {
        return Err(AppError::forbidden("Account has been disabled".to_string()));
    }

    if user.is_locked() {
        tracing::warn!(username = %username, "Login rejected - account locked");
        return Err(AppError::AccountLocked);
    }

    let password_valid = user
        .verify_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

    if !password_valid {
        repo.record_failed_attempt(&user).await?;
        tracing::warn!(username = %username, "Login failed - invalid credentials");
        return Err(AppError::invalid_credentials());
    }

    repo.record_successful_login(&user).await?;

    let user_id = user.id.as_ref().map(|id| id.to_string()).unwrap_or_default();
    let token = state
        .get_jwt_service()
        .generate_token(&user_id, &user.username, user.role, &user.assigned_hotels)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(
        user_id = %user_id,
        username = %user.username,
        role = %user.role.as_str(),
        "User logged in successfully"
    );

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

/// Current user info, refreshed from the database
pub async fn me(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<UserInfo>> {
    let repo = UserRepository::new(state.get_db());
    let user = repo
        .find_by_id(&current.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {}", current.username)))?;

    Ok(Json(user.into()))
}
