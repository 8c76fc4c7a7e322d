//! Database Module
//!
//! Embedded SurrealDB. The engine is chosen by configuration: RocksDB for
//! the persistent profile, in-memory for tests and throwaway dev runs.
//! Repositories receive the handle through their constructors; there is
//! no ambient global store.

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::core::config::DatabaseConfig;
use crate::utils::AppError;

const NAMESPACE: &str = "tajbyhand";
const DATABASE: &str = "main";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open the configured engine and apply schema definitions
    pub async fn open(config: &DatabaseConfig) -> Result<Self, AppError> {
        let db = match config {
            DatabaseConfig::Memory => Surreal::new::<Mem>(())
                .await
                .map_err(|e| AppError::database(format!("Failed to open in-memory db: {e}")))?,
            DatabaseConfig::RocksDb(path) => Surreal::new::<RocksDb>(path.as_path())
                .await
                .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?,
        };

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        Self::define_schema(&db).await?;

        tracing::info!(engine = %config.label(), "Database connection established");

        Ok(Self { db })
    }

    /// In-memory instance, used by tests
    pub async fn memory() -> Result<Self, AppError> {
        Self::open(&DatabaseConfig::Memory).await
    }

    /// Idempotent index definitions
    ///
    /// The unique indexes back the application-level duplicate checks for
    /// hotel slugs and usernames.
    async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
        const DEFINITIONS: &[&str] = &[
            "DEFINE INDEX IF NOT EXISTS users_username ON TABLE users COLUMNS username UNIQUE",
            "DEFINE INDEX IF NOT EXISTS hotels_slug ON TABLE hotels COLUMNS slug UNIQUE",
            "DEFINE INDEX IF NOT EXISTS orders_hotel_slug ON TABLE orders COLUMNS hotel_slug",
            "DEFINE INDEX IF NOT EXISTS orders_status ON TABLE orders COLUMNS status",
            "DEFINE INDEX IF NOT EXISTS orders_created_at ON TABLE orders COLUMNS created_at",
        ];

        for definition in DEFINITIONS {
            db.query(*definition)
                .await
                .map_err(|e| AppError::database(format!("Schema definition failed: {e}")))?;
        }
        Ok(())
    }
}
