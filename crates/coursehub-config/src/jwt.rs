use std::env;

use crate::env_or;

/// Seven days, the lifetime of a session token.
pub const DEFAULT_ACCESS_TOKEN_EXPIRY_SECS: i64 = 7 * 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Access token lifetime in seconds.
    pub access_token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your-secret-key-change-in-production".to_string()),
            access_token_expiry: env_or("JWT_ACCESS_EXPIRY", DEFAULT_ACCESS_TOKEN_EXPIRY_SECS),
        }
    }

    pub fn new(secret: impl Into<String>, access_token_expiry: i64) -> Self {
        Self {
            secret: secret.into(),
            access_token_expiry,
        }
    }
}
