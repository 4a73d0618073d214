use sqlx::PgPool;

use coursehub_auth::IdentityResolver;
use coursehub_config::{CorsConfig, JwtConfig, MediaConfig};

use crate::modules::users::directory::PgUserDirectory;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub media_config: MediaConfig,
    /// Resolves bearer tokens against the live `users` table on every request.
    pub identity: IdentityResolver<PgUserDirectory>,
}

impl AppState {
    pub fn new(
        db: PgPool,
        jwt_config: JwtConfig,
        cors_config: CorsConfig,
        media_config: MediaConfig,
    ) -> Self {
        let identity = IdentityResolver::new(jwt_config.clone(), PgUserDirectory::new(db.clone()));
        Self {
            db,
            jwt_config,
            cors_config,
            media_config,
            identity,
        }
    }
}
