//! Server configuration
//!
//! # Environment variables
//!
//! | Variable | Default | Notes |
//! |----------|---------|-------|
//! | WORK_DIR | /var/lib/tajbyhand | uploads, logs, database |
//! | HTTP_PORT | 3000 | HTTP API port |
//! | BASE_URL | http://localhost:3000 | base for hotel tracking links |
//! | WHATSAPP_NUMBER | — | business WhatsApp number, required |
//! | DATABASE | WORK_DIR/database | RocksDB path, or `memory` |
//! | STATUS_VOCABULARY | delivery | `delivery` or `simple` |
//! | JWT_SECRET | — | required in release builds, ≥ 32 chars |
//! | JWT_EXPIRATION_MINUTES | 1440 | token lifetime |
//! | ENVIRONMENT | development | development / staging / production |
//! | REQUEST_TIMEOUT_MS | 30000 | per-request timeout |
//! | RATE_LIMIT_MAX | 30 | requests per identity per window |
//! | RATE_LIMIT_WINDOW_SECS | 60 | sliding window length |
//!
//! None of the defaults are production-suitable; deployments supply all
//! of WHATSAPP_NUMBER, JWT_SECRET, BASE_URL and DATABASE explicitly.

use std::path::PathBuf;
use std::str::FromStr;

use crate::auth::JwtConfig;
use crate::db::models::StatusVocabulary;

/// Storage engine selection
#[derive(Debug, Clone)]
pub enum DatabaseConfig {
    /// In-memory engine: tests and throwaway dev runs
    Memory,
    /// Persistent embedded RocksDB
    RocksDb(PathBuf),
}

impl DatabaseConfig {
    pub fn label(&self) -> String {
        match self {
            DatabaseConfig::Memory => "memory".to_string(),
            DatabaseConfig::RocksDb(path) => format!("rocksdb:{}", path.display()),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for uploads, logs and the default database path
    pub work_dir: String,
    pub http_port: u16,
    /// Base URL embedded into hotel tracking links
    pub base_url: String,
    /// Business WhatsApp number for generated deep links
    pub whatsapp_number: String,
    pub database: DatabaseConfig,
    /// Order status vocabulary profile
    pub status_vocabulary: StatusVocabulary,
    pub jwt: JwtConfig,
    /// development | staging | production
    pub environment: String,
    pub request_timeout_ms: u64,
    pub rate_limit_max: usize,
    pub rate_limit_window_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let work_dir =
            std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/tajbyhand".to_string());

        let database = match std::env::var("DATABASE") {
            Ok(value) if value == "memory" => DatabaseConfig::Memory,
            Ok(value) => DatabaseConfig::RocksDb(PathBuf::from(value)),
            Err(_) => DatabaseConfig::RocksDb(PathBuf::from(&work_dir).join("database")),
        };

        let status_vocabulary = std::env::var("STATUS_VOCABULARY")
            .ok()
            .and_then(|v| StatusVocabulary::from_str(&v).ok())
            .unwrap_or(StatusVocabulary::Delivery);

        let whatsapp_number = std::env::var("WHATSAPP_NUMBER").unwrap_or_else(|_| {
            tracing::warn!("WHATSAPP_NUMBER not set, using placeholder number");
            "919876543210".to_string()
        });

        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            base_url: std::env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            whatsapp_number,
            database,
            status_vocabulary,
            jwt: JwtConfig::from_env(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30_000),
            rate_limit_max: std::env::var("RATE_LIMIT_MAX")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30),
            rate_limit_window_secs: std::env::var("RATE_LIMIT_WINDOW_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(60),
            work_dir,
        }
    }

    /// In-memory configuration for tests
    pub fn for_tests(work_dir: impl Into<String>) -> Self {
        Self {
            work_dir: work_dir.into(),
            http_port: 0,
            base_url: "http://localhost:3000".to_string(),
            whatsapp_number: "919876543210".to_string(),
            database: DatabaseConfig::Memory,
            status_vocabulary: StatusVocabulary::Delivery,
            jwt: JwtConfig::ephemeral(),
            environment: "test".to_string(),
            request_timeout_ms: 5_000,
            rate_limit_max: 1_000,
            rate_limit_window_secs: 60,
        }
    }

    pub fn uploads_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("uploads")
    }

    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
