//! Student registration server.
//!
//! Public intake of registration forms plus a token-protected admin API:
//! - Submit registrations with full field validation
//! - Single configured admin account with 24h signed tokens
//! - List, delete, statistics and CSV export over all registrations

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod export;

pub use auth::{AdminAuth, AdminClaims};
pub use config::Config;
pub use error::ApiError;
