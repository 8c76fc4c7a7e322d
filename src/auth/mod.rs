//! Authentication and authorization
//!
//! JWT + argon2 based: passwords are verified against argon2 hashes on
//! the user record, successful logins mint an HS256 bearer token, and
//! middleware decodes it back into a [`CurrentUser`] for role checks.

pub mod jwt;
pub mod middleware;
pub mod permissions;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth, require_permission};
