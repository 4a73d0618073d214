//! # Coursehub Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`database`]: connection pool settings
//! - [`jwt`]: token signing secret and lifetime
//! - [`cors`]: allowed browser origins
//! - [`media`]: upload limits and the public base URL for media links
//! - [`server`]: listen addresses
//!
//! # Example
//!
//! ```ignore
//! use coursehub_config::{DatabaseConfig, JwtConfig};
//!
//! dotenvy::dotenv().ok();
//! let db = DatabaseConfig::from_env()?;
//! let jwt = JwtConfig::from_env();
//! ```

use std::env;
use std::str::FromStr;

pub mod cors;
pub mod database;
pub mod jwt;
pub mod media;
pub mod server;

pub use cors::CorsConfig;
pub use database::{DatabaseConfig, MissingVar};
pub use jwt::JwtConfig;
pub use media::MediaConfig;
pub use server::ServerConfig;

/// Reads `key` and parses it, falling back to `default` when unset or unparsable.
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}
