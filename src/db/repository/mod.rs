//! Repository Module
//!
//! CRUD and query operations over the embedded database, one repository
//! per table. Handlers map [`RepoError`] into the HTTP error taxonomy
//! through `From<RepoError> for AppError`.

pub mod hotel;
pub mod order;
pub mod product;
pub mod report;
pub mod user;

pub use hotel::HotelRepository;
pub use order::{OrderListFilter, OrderPage, OrderRepository, TransitionOutcome};
pub use product::{ProductFilter, ProductRepository};
pub use report::{HotelCommissionReport, OrdersSummary};
pub use user::UserRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Accepts ids both as the bare key and as the "table:key" string
pub(crate) fn strip_table_prefix<'a>(table: &str, id: &'a str) -> &'a str {
    id.strip_prefix(table)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_only_matching_prefix() {
        assert_eq!(strip_table_prefix("orders", "orders:abc"), "abc");
        assert_eq!(strip_table_prefix("orders", "abc"), "abc");
        assert_eq!(strip_table_prefix("orders", "hotels:abc"), "hotels:abc");
    }
}
