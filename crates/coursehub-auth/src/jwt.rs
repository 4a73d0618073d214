//! Session token creation and verification (HS256, shared secret).
//!
//! # Example
//!
//! ```ignore
//! use coursehub_auth::{create_access_token, verify_token};
//! use coursehub_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user.id, &user.email, &user.permissions, &config)?;
//! let claims = verify_token(&token, &config)?;
//! ```

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use coursehub_config::JwtConfig;
use coursehub_core::{AppError, Capability};
use coursehub_models::{Email, UserId};

use crate::claims::Claims;

pub fn create_access_token(
    user_id: UserId,
    email: &Email,
    permissions: &[Capability],
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp().max(0) as usize;
    let exp = now + jwt_config.access_token_expiry.max(0) as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        permissions: Capability::to_tags(permissions),
        exp,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to create token: {e}")))
}

/// Checks signature and expiry. Every failure is the same 401.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token"))
}
