use anyhow::Context;
use sqlx::PgPool;
use sqlx::types::Json;

use coursehub_auth::{UserDirectory, UserEntitlements};
use coursehub_core::Capability;
use coursehub_models::{CourseGrant, UserId};

/// [`UserDirectory`] backed by the `users` table.
#[derive(Clone, Debug)]
pub struct PgUserDirectory {
    db: PgPool,
}

impl PgUserDirectory {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

impl UserDirectory for PgUserDirectory {
    async fn load_entitlements(&self, user_id: UserId) -> anyhow::Result<Option<UserEntitlements>> {
        let row = sqlx::query_as::<_, (Vec<String>, Json<Vec<CourseGrant>>)>(
            "SELECT permissions, accessible_courses FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .context("Failed to load user entitlements")?;

        Ok(row.map(|(permissions, grants)| UserEntitlements {
            permissions: Capability::parse_stored(&permissions),
            accessible_course_ids: grants.0.iter().map(|g| g.course_id).collect(),
        }))
    }
}
