//! Users, their course grants, and the admin user-management DTOs.

use chrono::{DateTime, Utc};
use coursehub_core::{Capability, PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::ids::{CourseId, UserId};
use crate::value_types::Email;

/// Who issued a grant, captured at grant time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GrantedBy {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
}

/// Entitles one user to view one course. Never expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CourseGrant {
    pub course_id: CourseId,
    pub granted_by: GrantedBy,
    pub granted_at: DateTime<Utc>,
}

/// Database row for `users`, minus the password hash.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub permissions: Vec<String>,
    pub accessible_courses: Json<Vec<CourseGrant>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub permissions: Vec<Capability>,
    pub accessible_courses: Vec<CourseGrant>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            permissions: Capability::parse_stored(&row.permissions),
            accessible_courses: row.accessible_courses.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl User {
    pub fn granted_course_ids(&self) -> impl Iterator<Item = CourseId> + '_ {
        self.accessible_courses.iter().map(|g| g.course_id)
    }

    pub fn as_granter(&self) -> GrantedBy {
        GrantedBy {
            user_id: self.id,
            name: self.name.clone(),
            email: self.email.to_string(),
        }
    }
}

/// Rebuilds a grant list for `requested` course ids.
///
/// Ids are de-duplicated keeping first occurrence. A course the user already
/// had keeps its original grant record; new ones are stamped with `granter`
/// and `now`.
pub fn merge_grants(
    existing: &[CourseGrant],
    requested: &[CourseId],
    granter: &GrantedBy,
    now: DateTime<Utc>,
) -> Vec<CourseGrant> {
    let mut merged: Vec<CourseGrant> = Vec::with_capacity(requested.len());

    for course_id in requested {
        if merged.iter().any(|g| g.course_id == *course_id) {
            continue;
        }
        let grant = existing
            .iter()
            .find(|g| g.course_id == *course_id)
            .cloned()
            .unwrap_or_else(|| CourseGrant {
                course_id: *course_id,
                granted_by: granter.clone(),
                granted_at: now,
            });
        merged.push(grant);
    }

    merged
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: Option<String>,
    /// Full replacement; an empty list is stored as `["user"]`.
    pub permissions: Option<Vec<Capability>>,
    /// Full replacement of the user's course grants, by course id.
    #[schema(value_type = Option<Vec<String>>)]
    pub accessible_courses: Option<Vec<CourseId>>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserFilterParams {
    /// Case-insensitive match on name or email
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedUsersResponse {
    pub data: Vec<User>,
    pub meta: PaginationMeta,
}
