//! User Model
//!
//! Back-office identities. Passwords are argon2-hashed; repeated failed
//! logins trip a temporary lockout.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;
use crate::utils::time;

pub type UserId = RecordId;

/// Failed attempts before the account locks
pub const MAX_FAILED_ATTEMPTS: u32 = 5;

/// Lockout window after the limit trips
pub const LOCK_DURATION_MINUTES: i64 = 2 * 60;

/// Back-office role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    HotelViewer,
    Operator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::HotelViewer => "hotel_viewer",
            Role::Operator => "operator",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "hotel_viewer" => Ok(Role::HotelViewer),
            "operator" => Ok(Role::Operator),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// User model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<UserId>,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub hash_pass: String,
    pub role: Role,
    /// Hotel slugs a hotel_viewer may see; ignored for other roles
    #[serde(default)]
    pub assigned_hotels: Vec<String>,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub is_active: bool,
    #[serde(default)]
    pub failed_attempts: u32,
    #[serde(default)]
    pub lock_until: Option<String>,
    #[serde(default)]
    pub last_login: Option<String>,
    pub created_at: String,
}

fn default_true() -> bool {
    true
}

impl User {
    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.hash_pass)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }

    /// True while a lockout window is still running
    pub fn is_locked(&self) -> bool {
        self.is_locked_at(&time::now())
    }

    pub fn is_locked_at(&self, now: &str) -> bool {
        self.lock_until.as_deref().is_some_and(|until| now < until)
    }
}

/// Create user payload (admin seeding and user management)
#[derive(Debug, Clone, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub assigned_hotels: Vec<String>,
}
