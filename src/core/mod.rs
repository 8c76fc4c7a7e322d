//! Core: configuration, state, server

pub mod config;
pub mod server;
pub mod state;

pub use config::{Config, DatabaseConfig};
pub use server::Server;
pub use state::ServerState;
