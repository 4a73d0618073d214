use anyhow::Context;
use sqlx::{FromRow, PgPool};
use tracing::{info, instrument, warn};

use coursehub_auth::create_access_token;
use coursehub_config::JwtConfig;
use coursehub_core::{AppError, hash_password, verify_password};
use coursehub_models::{AuthResponse, LoginRequest, SignupRequest, User, UserRow};
use coursehub_observability::{
    track_jwt_issued, track_login_failure, track_login_success, track_user_signup,
};

use crate::modules::users::service::USER_COLUMNS;

#[derive(FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    user: UserRow,
    password: String,
}

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, jwt_config))]
    pub async fn signup(
        db: &PgPool,
        jwt_config: &JwtConfig,
        dto: SignupRequest,
    ) -> Result<AuthResponse, AppError> {
        let password_hash = hash_password(&dto.password)?;

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (name, email, password) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        ))
        .bind(dto.name.trim())
        .bind(&dto.email)
        .bind(&password_hash)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::conflict("An account with this email already exists");
            }
            AppError::database(anyhow::Error::new(e).context("Failed to create user"))
        })?;

        let user = User::from(row);
        let token = create_access_token(user.id, &user.email, &user.permissions, jwt_config)?;

        track_user_signup();
        track_jwt_issued();
        info!(user_id = %user.id, "user signed up");

        Ok(AuthResponse { token, user })
    }

    #[instrument(skip(db, jwt_config))]
    pub async fn login(
        db: &PgPool,
        jwt_config: &JwtConfig,
        dto: LoginRequest,
    ) -> Result<AuthResponse, AppError> {
        let row = sqlx::query_as::<_, CredentialRow>(&format!(
            "SELECT {USER_COLUMNS}, password FROM users WHERE email = $1"
        ))
        .bind(&dto.email)
        .fetch_optional(db)
        .await
        .context("Failed to fetch user by email")
        .map_err(AppError::database)?;

        let Some(row) = row else {
            track_login_failure("unknown_email");
            warn!("login failed: unknown email");
            return Err(AppError::unauthorized("Invalid credentials"));
        };

        if !verify_password(&dto.password, &row.password) {
            track_login_failure("wrong_password");
            warn!(user_id = %row.user.id, "login failed: wrong password");
            return Err(AppError::unauthorized("Invalid credentials"));
        }

        let user = User::from(row.user);
        let token = create_access_token(user.id, &user.email, &user.permissions, jwt_config)?;

        track_login_success();
        track_jwt_issued();

        Ok(AuthResponse { token, user })
    }
}
