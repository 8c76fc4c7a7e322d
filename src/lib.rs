//! TajByHand Server: WhatsApp-first handicraft storefront backend
//!
//! # Architecture overview
//!
//! Hotel guests scan a partner hotel's QR, browse the catalog, and place
//! orders that redirect into a WhatsApp chat for fulfillment. The server
//! keeps the order ledger, credits hotel commissions on delivery, and
//! exposes an authenticated back office.
//!
//! - **Catalog** (`db`): products and hotels in embedded SurrealDB
//! - **Order lifecycle** (`db::repository::order`): snapshot-on-create,
//!   conditional status transitions, exactly-once commission accrual
//! - **Reporting** (`db::repository::report`): pure folds over the ledger
//! - **WhatsApp** (`whatsapp`): pure `wa.me` deep-link generation
//! - **Auth** (`auth`): JWT + argon2, role-based authorization
//! - **HTTP API** (`api`): axum routers, one module per resource
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── core/          # config, state, server
//! ├── auth/          # JWT, middleware, permissions
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # models and repositories
//! ├── whatsapp.rs    # deep-link generation
//! └── utils/         # errors, logging, fingerprint, rate limiting
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod utils;
pub mod whatsapp;

// Re-export public types
pub use crate::core::{Config, Server, ServerState};
pub use auth::{CurrentUser, JwtService};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
 _____     _ ____        _   _                 _
|_   _|_ _(_) __ ) _   _| | | | __ _ _ __   __| |
  | |/ _` | |  _ \| | | | |_| |/ _` | '_ \ / _` |
  | | (_| | | |_) | |_| |  _  | (_| | | | | (_| |
  |_|\__,_| |____/ \__, |_| |_|\__,_|_| |_|\__,_|
                   |___/
    "#
    );
}
