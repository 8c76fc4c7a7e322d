//! API route modules
//!
//! # Structure
//!
//! - [`health`] - liveness probe
//! - [`auth`] - login and session identity
//! - [`products`] - catalog reads and admin catalog management
//! - [`hotels`] - hotel registry, QR data and per-hotel statistics
//! - [`orders`] - order placement, lifecycle and summaries
//! - [`reports`] - commission reporting
//! - [`upload`] - product image upload

pub mod auth;
pub mod health;
pub mod hotels;
pub mod orders;
pub mod products;
pub mod reports;
pub mod upload;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
