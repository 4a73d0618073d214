//! # Coursehub Models
//!
//! Domain models and DTOs for the Coursehub API: database rows, request and
//! response bodies, and the validated primitives they are built from.
//!
//! # Modules
//!
//! - [`auth`]: signup, login and session payloads
//! - [`courses`]: courses, embedded videos, catalog and search payloads
//! - [`ids`]: strongly-typed UUID newtypes
//! - [`media`]: stored image/video blobs
//! - [`users`]: users, course grants, admin user management
//! - [`value_types`]: [`Email`] and [`Price`]

pub mod auth;
pub mod courses;
pub mod ids;
pub mod media;
pub mod users;
pub mod value_types;

pub use auth::{AuthResponse, LoginRequest, SignupRequest};
pub use courses::{
    CatalogParams, CatalogSort, Course, CourseCatalogResponse, CourseWithAccess, CreateCourseDto,
    Privacy, ReplaceVideosDto, SearchParams, SearchResponse, SearchResult, SearchResultKind,
    UpdateCourseDto, Video, effective_privacy,
};
pub use ids::{CourseId, MediaId, UserId};
pub use media::{MediaKind, MediaMetadata, MediaUploadForm, MediaUploadResponse};
pub use users::{
    CourseGrant, GrantedBy, PaginatedUsersResponse, UpdateUserDto, User, UserFilterParams,
    UserRow, merge_grants,
};
pub use value_types::{Email, Price, ValueTypeError};
