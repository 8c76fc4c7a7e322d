//! User Repository
//!
//! Lookup plus the failed-attempt/lockout bookkeeping around login. The
//! attempt counters are best-effort telemetry against brute force, not a
//! linearizable limit.

use serde_json::json;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::user::{LOCK_DURATION_MINUTES, MAX_FAILED_ATTEMPTS};
use crate::db::models::{User, UserCreate};
use crate::utils::time;

const USER_TABLE: &str = "users";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM users WHERE username = $username LIMIT 1")
            .bind(("username", username.to_lowercase()))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let pure_id = strip_table_prefix(USER_TABLE, id);
        let user: Option<User> = self.base.db().select((USER_TABLE, pure_id)).await?;
        Ok(user)
    }

    /// Create a user with a freshly hashed password
    ///
    /// The password hash never round-trips through `User` serialization
    /// (the field is skip_serializing), so the insert goes through an
    /// explicit JSON body.
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        let username = data.username.to_lowercase();
        if self.find_by_username(&username).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Username already in use: {}",
                username
            )));
        }

        let hash = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Password hashing failed: {}", e)))?;

        let record = json!({
            "username": username,
            "email": data.email.to_lowercase(),
            "hash_pass": hash,
            "role": data.role,
            "assigned_hotels": data.assigned_hotels,
            "is_active": true,
            "failed_attempts": 0,
            "created_at": time::now(),
        });

        let created: Option<User> = self.base.db().create(USER_TABLE).content(record).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Record a failed login attempt, arming the lock at the threshold
    ///
    /// An expired lock restarts the count at 1 instead of stacking onto
    /// stale attempts.
    pub async fn record_failed_attempt(&self, user: &User) -> RepoResult<()> {
        let Some(id) = &user.id else {
            return Err(RepoError::Validation("User has no id".to_string()));
        };

        let now = time::now();
        let lock_expired = user
            .lock_until
            .as_deref()
            .is_some_and(|until| now.as_str() >= until);

        let attempts = if lock_expired {
            1
        } else {
            user.failed_attempts + 1
        };

        let lock_until = if attempts >= MAX_FAILED_ATTEMPTS {
            Some(time::now_plus_minutes(LOCK_DURATION_MINUTES))
        } else if lock_expired {
            None
        } else {
            user.lock_until.clone()
        };

        self.base
            .db()
            .query("UPDATE type::thing('users', $id) SET failed_attempts = $attempts, lock_until = $lock_until")
            .bind(("id", id.key().to_string()))
            .bind(("attempts", attempts))
            .bind(("lock_until", lock_until))
            .await?;
        Ok(())
    }

    /// Clear the attempt counter and stamp a successful login
    pub async fn record_successful_login(&self, user: &User) -> RepoResult<()> {
        let Some(id) = &user.id else {
            return Err(RepoError::Validation("User has no id".to_string()));
        };

        self.base
            .db()
            .query("UPDATE type::thing('users', $id) SET failed_attempts = 0, lock_until = NONE, last_login = $now")
            .bind(("id", id.key().to_string()))
            .bind(("now", time::now()))
            .await?;
        Ok(())
    }
}
