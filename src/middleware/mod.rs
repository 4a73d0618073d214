//! Extractors for authentication and authorization.
//!
//! # Modules
//!
//! - [`auth`]: identity extractors and capability-gated extractors
//!
//! # Authentication Flow
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. The extractor verifies the token and re-reads the user's permissions and
//!    grants from the database
//! 3. Capability extractors run the relevant mutation check
//! 4. Handler executes if all checks pass
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::{OptionalIdentity, RequireCourseManager};
//!
//! // Public surface: anonymous callers are fine
//! async fn get_course(OptionalIdentity(identity): OptionalIdentity) -> impl IntoResponse {
//!     // ...
//! }
//!
//! // Admin surface
//! async fn delete_course(RequireCourseManager(auth_user): RequireCourseManager) -> impl IntoResponse {
//!     // Only executes for admin or manage_courses
//! }
//! ```

pub mod auth;
