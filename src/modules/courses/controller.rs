use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::{debug, instrument};

use coursehub_auth::{access_rule, filter_for_listing};
use coursehub_core::{AppError, ErrorResponse};
use coursehub_models::{
    CatalogParams, Course, CourseCatalogResponse, CourseId, CourseWithAccess, CreateCourseDto,
    ReplaceVideosDto, UpdateCourseDto, Video,
};
use coursehub_observability::track_access_decision;

use crate::middleware::auth::{OptionalIdentity, RequireCourseManager};
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::CourseService;

/// Public catalog
///
/// Only public courses are listed. Each carries `has_access` for the caller;
/// video URLs are omitted where it is false.
#[utoipa::path(
    get,
    path = "/api/courses",
    params(CatalogParams),
    responses(
        (status = 200, description = "Public courses", body = CourseCatalogResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security((), ("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, identity))]
pub async fn get_courses(
    State(state): State<AppState>,
    OptionalIdentity(identity): OptionalIdentity,
    Query(params): Query<CatalogParams>,
) -> Result<Json<CourseCatalogResponse>, AppError> {
    let courses = CourseService::get_public_courses(&state.db, params.sort).await?;
    let courses = filter_for_listing(&identity, courses, params.sort);

    Ok(Json(CourseCatalogResponse {
        total: courses.len(),
        courses,
    }))
}

/// Course viewer
///
/// Any privacy tier can be opened by id. Videos are only included when the
/// caller has access.
#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    params(("id" = String, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course with the caller's access", body = CourseWithAccess),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security((), ("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, identity))]
pub async fn get_course(
    State(state): State<AppState>,
    OptionalIdentity(identity): OptionalIdentity,
    Path(id): Path<CourseId>,
) -> Result<Json<CourseWithAccess>, AppError> {
    let course = CourseService::get_course(&state.db, id).await?;

    let rule = access_rule(&identity, &course);
    track_access_decision(rule.as_str());
    debug!(
        course_id = %id,
        user_id = ?identity.user_id(),
        rule = rule.as_str(),
        "course access decided"
    );

    Ok(Json(CourseWithAccess::new(course, rule.is_granted())))
}

/// All courses, any privacy, newest first
#[utoipa::path(
    get,
    path = "/api/admin/courses",
    responses(
        (status = 200, description = "All courses", body = Vec<Course>),
        (status = 401, description = "Unauthenticated or missing course permission", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Course Admin"
)]
#[instrument(skip(state))]
pub async fn list_admin_courses(
    State(state): State<AppState>,
    _manager: RequireCourseManager,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = CourseService::get_all_courses(&state.db).await?;
    Ok(Json(courses))
}

/// Create a course
///
/// A course with a non-zero price is always stored as private.
#[utoipa::path(
    post,
    path = "/api/admin/courses",
    request_body = CreateCourseDto,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 401, description = "Unauthenticated or missing course permission", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Course Admin"
)]
#[instrument(skip(state))]
pub async fn create_course(
    State(state): State<AppState>,
    _manager: RequireCourseManager,
    ValidatedJson(dto): ValidatedJson<CreateCourseDto>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    let course = CourseService::create_course(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

#[utoipa::path(
    get,
    path = "/api/admin/courses/{id}",
    params(("id" = String, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course with all video URLs", body = Course),
        (status = 401, description = "Unauthenticated or missing course permission", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Course Admin"
)]
#[instrument(skip(state))]
pub async fn get_admin_course(
    State(state): State<AppState>,
    _manager: RequireCourseManager,
    Path(id): Path<CourseId>,
) -> Result<Json<Course>, AppError> {
    let course = CourseService::get_course(&state.db, id).await?;
    Ok(Json(course))
}

/// Partially update a course
#[utoipa::path(
    patch,
    path = "/api/admin/courses/{id}",
    params(("id" = String, Path, description = "Course ID")),
    request_body = UpdateCourseDto,
    responses(
        (status = 200, description = "Updated course", body = Course),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 401, description = "Unauthenticated or missing course permission", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Course Admin"
)]
#[instrument(skip(state))]
pub async fn update_course(
    State(state): State<AppState>,
    _manager: RequireCourseManager,
    Path(id): Path<CourseId>,
    ValidatedJson(dto): ValidatedJson<UpdateCourseDto>,
) -> Result<Json<Course>, AppError> {
    let course = CourseService::update_course(&state.db, id, dto).await?;
    Ok(Json(course))
}

/// Delete a course and the uploaded videos it links to
#[utoipa::path(
    delete,
    path = "/api/admin/courses/{id}",
    params(("id" = String, Path, description = "Course ID")),
    responses(
        (status = 204, description = "Course deleted"),
        (status = 401, description = "Unauthenticated or missing course permission", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Course Admin"
)]
#[instrument(skip(state))]
pub async fn delete_course(
    State(state): State<AppState>,
    _manager: RequireCourseManager,
    Path(id): Path<CourseId>,
) -> Result<StatusCode, AppError> {
    CourseService::delete_course(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Append one video to the end of a course's list
#[utoipa::path(
    post,
    path = "/api/admin/courses/{id}/videos",
    params(("id" = String, Path, description = "Course ID")),
    request_body = Video,
    responses(
        (status = 201, description = "Video appended", body = Video),
        (status = 401, description = "Unauthenticated or missing course permission", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Course Admin"
)]
#[instrument(skip(state))]
pub async fn append_video(
    State(state): State<AppState>,
    _manager: RequireCourseManager,
    Path(id): Path<CourseId>,
    ValidatedJson(video): ValidatedJson<Video>,
) -> Result<(StatusCode, Json<Video>), AppError> {
    let video = CourseService::append_video(&state.db, id, video).await?;
    Ok((StatusCode::CREATED, Json(video)))
}

/// Replace the ordered video list
#[utoipa::path(
    put,
    path = "/api/admin/courses/{id}/videos",
    params(("id" = String, Path, description = "Course ID")),
    request_body = ReplaceVideosDto,
    responses(
        (status = 200, description = "Course with the new video list", body = Course),
        (status = 401, description = "Unauthenticated or missing course permission", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Course Admin"
)]
#[instrument(skip(state))]
pub async fn replace_videos(
    State(state): State<AppState>,
    _manager: RequireCourseManager,
    Path(id): Path<CourseId>,
    ValidatedJson(dto): ValidatedJson<ReplaceVideosDto>,
) -> Result<Json<Course>, AppError> {
    let course = CourseService::replace_videos(&state.db, id, dto.videos).await?;
    Ok(Json(course))
}
