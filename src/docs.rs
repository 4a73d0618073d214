use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use coursehub_core::{Capability, ErrorResponse, PaginationMeta, PaginationParams};
use coursehub_models::{
    AuthResponse, CatalogSort, Course, CourseCatalogResponse, CourseGrant, CourseWithAccess,
    CreateCourseDto, GrantedBy, LoginRequest, MediaKind, MediaUploadForm, MediaUploadResponse,
    PaginatedUsersResponse, Privacy, ReplaceVideosDto, SearchResponse, SearchResult,
    SearchResultKind, SignupRequest, UpdateCourseDto, UpdateUserDto, User, Video,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::signup_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::get_me,
        crate::modules::courses::controller::get_courses,
        crate::modules::courses::controller::get_course,
        crate::modules::courses::controller::list_admin_courses,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::get_admin_course,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::courses::controller::append_video,
        crate::modules::courses::controller::replace_videos,
        crate::modules::search::controller::search_courses,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::media::controller::upload_image,
        crate::modules::media::controller::upload_video,
        crate::modules::media::controller::get_image,
        crate::modules::media::controller::get_video,
        crate::modules::media::controller::delete_video,
    ),
    components(
        schemas(
            SignupRequest,
            LoginRequest,
            AuthResponse,
            User,
            Capability,
            CourseGrant,
            GrantedBy,
            UpdateUserDto,
            PaginatedUsersResponse,
            Course,
            CourseWithAccess,
            CourseCatalogResponse,
            CatalogSort,
            Privacy,
            Video,
            CreateCourseDto,
            UpdateCourseDto,
            ReplaceVideosDto,
            SearchResponse,
            SearchResult,
            SearchResultKind,
            MediaKind,
            MediaUploadForm,
            MediaUploadResponse,
            ErrorResponse,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Signup, login and the current user"),
        (name = "Courses", description = "Public catalog, course viewer and search"),
        (name = "Course Admin", description = "Course and video management"),
        (name = "Users", description = "User permissions and course grants"),
        (name = "Media", description = "Image and video upload and delivery")
    ),
    info(
        title = "Coursehub API",
        version = "0.1.0",
        description = "Course catalog and viewer with per-user course grants, built with Rust, Axum and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
