use std::collections::HashSet;

use anyhow::Context;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::{info, instrument};

use coursehub_core::{AppError, Capability, PaginationMeta};
use coursehub_models::{
    CourseId, GrantedBy, PaginatedUsersResponse, UpdateUserDto, User, UserFilterParams, UserId,
    UserRow, merge_grants,
};

use crate::modules::search::service::escape_like;

/// Every `users` column except the password hash.
pub(crate) const USER_COLUMNS: &str =
    "id, name, email, permissions, accessible_courses, created_at, updated_at";

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, id: UserId) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch user by ID")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        Ok(row.into())
    }

    #[instrument(skip(db))]
    pub async fn get_users(
        db: &PgPool,
        filters: UserFilterParams,
    ) -> Result<PaginatedUsersResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let search = filters
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", escape_like(s)));

        let where_clause = if search.is_some() {
            r" WHERE (name ILIKE $1 ESCAPE '\' OR email ILIKE $1 ESCAPE '\')"
        } else {
            ""
        };

        let count_query = format!("SELECT COUNT(*) FROM users{where_clause}");
        let mut count_sql = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(pattern) = &search {
            count_sql = count_sql.bind(pattern);
        }
        let total = count_sql
            .fetch_one(db)
            .await
            .context("Failed to count users")
            .map_err(AppError::database)?;

        let data_query = format!(
            "SELECT {USER_COLUMNS} FROM users{where_clause} ORDER BY created_at DESC, id LIMIT {limit} OFFSET {offset}"
        );
        let mut data_sql = sqlx::query_as::<_, UserRow>(&data_query);
        if let Some(pattern) = &search {
            data_sql = data_sql.bind(pattern);
        }
        let rows = data_sql
            .fetch_all(db)
            .await
            .context("Failed to fetch users")
            .map_err(AppError::database)?;

        Ok(PaginatedUsersResponse {
            data: rows.into_iter().map(User::from).collect(),
            meta: PaginationMeta::new(&filters.pagination, total),
        })
    }

    /// Replaces name, permissions and grants on one user.
    ///
    /// The row is locked for the duration so concurrent edits of the same
    /// user apply one after the other.
    #[instrument(skip(db, granter))]
    pub async fn update_user(
        db: &PgPool,
        id: UserId,
        granter: &GrantedBy,
        dto: UpdateUserDto,
    ) -> Result<User, AppError> {
        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let existing: User = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to lock user")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?
        .into();

        let name = dto
            .name
            .map(|n| n.trim().to_string())
            .unwrap_or_else(|| existing.name.clone());

        let permissions = match dto.permissions {
            Some(requested) => Capability::normalize(requested),
            None => existing.permissions.clone(),
        };

        let grants = match dto.accessible_courses {
            Some(requested) => {
                let requested = dedupe(requested);
                // Grants already held stay valid even if their course was deleted since.
                let held: HashSet<CourseId> = existing.granted_course_ids().collect();
                let new_ids: Vec<CourseId> = requested
                    .iter()
                    .filter(|id| !held.contains(id))
                    .copied()
                    .collect();
                let unknown = Self::unknown_course_ids(&mut tx, &new_ids).await?;
                if !unknown.is_empty() {
                    let listed: Vec<String> = unknown.iter().map(ToString::to_string).collect();
                    return Err(AppError::bad_request(anyhow::anyhow!(
                        "Unknown course ids: {}",
                        listed.join(", ")
                    )));
                }
                merge_grants(&existing.accessible_courses, &requested, granter, Utc::now())
            }
            None => existing.accessible_courses.clone(),
        };

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"UPDATE users
               SET name = $2, permissions = $3, accessible_courses = $4, updated_at = NOW()
               WHERE id = $1
               RETURNING {USER_COLUMNS}"#
        ))
        .bind(id)
        .bind(&name)
        .bind(Capability::to_tags(&permissions))
        .bind(Json(&grants))
        .fetch_one(&mut *tx)
        .await
        .context("Failed to update user")
        .map_err(AppError::database)?;

        tx.commit()
            .await
            .context("Failed to commit user update")
            .map_err(AppError::database)?;

        info!(
            user_id = %id,
            granted_by = %granter.user_id,
            grants = grants.len(),
            "user permissions and grants replaced"
        );

        Ok(row.into())
    }

    async fn unknown_course_ids(
        conn: &mut sqlx::PgConnection,
        requested: &[CourseId],
    ) -> Result<Vec<CourseId>, AppError> {
        if requested.is_empty() {
            return Ok(Vec::new());
        }

        let found: Vec<CourseId> =
            sqlx::query_scalar::<_, CourseId>("SELECT id FROM courses WHERE id = ANY($1)")
                .bind(requested)
                .fetch_all(conn)
                .await
                .context("Failed to check course ids")
                .map_err(AppError::database)?;

        Ok(requested
            .iter()
            .filter(|id| !found.contains(id))
            .copied()
            .collect())
    }

    #[instrument(skip(db))]
    pub async fn delete_user(db: &PgPool, id: UserId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete user")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("User not found")));
        }

        Ok(())
    }
}

/// Keeps the first occurrence of each id.
fn dedupe(ids: Vec<CourseId>) -> Vec<CourseId> {
    let mut out: Vec<CourseId> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedupe_keeps_first_occurrence_order() {
        let a = CourseId::new();
        let b = CourseId::new();
        assert_eq!(dedupe(vec![b, a, b, a]), vec![b, a]);
        assert!(dedupe(vec![]).is_empty());
    }
}
