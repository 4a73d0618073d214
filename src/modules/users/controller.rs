use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use coursehub_core::{AppError, ErrorResponse};
use coursehub_models::{PaginatedUsersResponse, UpdateUserDto, User, UserFilterParams, UserId};

use crate::middleware::auth::RequireUserAdmin;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::UserService;

/// List users with optional search
#[utoipa::path(
    get,
    path = "/api/users",
    params(UserFilterParams),
    responses(
        (status = 200, description = "Page of users", body = PaginatedUsersResponse),
        (status = 401, description = "Unauthenticated or missing admin permission", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
    _admin: RequireUserAdmin,
    Query(filters): Query<UserFilterParams>,
) -> Result<Json<PaginatedUsersResponse>, AppError> {
    let users = UserService::get_users(&state.db, filters).await?;
    Ok(Json(users))
}

/// Replace a user's name, permissions or course grants
///
/// `permissions` and `accessible_courses` are full replacements. Grants for
/// courses the user already had keep their original metadata.
#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 400, description = "Malformed body or unknown course ids", body = ErrorResponse),
        (status = 401, description = "Unauthenticated or missing admin permission", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn update_user(
    State(state): State<AppState>,
    RequireUserAdmin(admin): RequireUserAdmin,
    Path(id): Path<UserId>,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<User>, AppError> {
    let granter = UserService::get_user(&state.db, admin.user_id)
        .await?
        .as_granter();
    let user = UserService::update_user(&state.db, id, &granter, dto).await?;
    Ok(Json(user))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, description = "Unauthenticated or missing admin permission", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    _admin: RequireUserAdmin,
    Path(id): Path<UserId>,
) -> Result<StatusCode, AppError> {
    UserService::delete_user(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
