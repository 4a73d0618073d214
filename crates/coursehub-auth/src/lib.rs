//! # Coursehub Auth
//!
//! Identity and access control for the Coursehub API.
//!
//! This crate provides:
//!
//! - [`claims`]: JWT claim structure for session tokens
//! - [`jwt`]: Token creation and verification utilities
//! - [`identity`]: the per-request [`ResolvedIdentity`]
//! - [`resolver`]: turning a bearer header into a [`ResolvedIdentity`] using a [`UserDirectory`]
//! - [`entitlement`]: the course access rules and mutation checks
//! - [`visibility`]: catalog filtering, ordering and access annotation
//!
//! # Example
//!
//! ```ignore
//! use coursehub_auth::{IdentityResolver, has_access};
//!
//! let identity = resolver.resolve_optional(header).await?;
//! if has_access(&identity, &course) {
//!     // serve the videos
//! }
//! ```

pub mod claims;
pub mod entitlement;
pub mod identity;
pub mod jwt;
pub mod resolver;
pub mod visibility;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use entitlement::{AccessRule, Gated, access_rule, can_mutate, can_mutate_users, has_access};
pub use identity::ResolvedIdentity;
pub use jwt::{create_access_token, verify_token};
pub use resolver::{IdentityError, IdentityResolver, UserDirectory, UserEntitlements, parse_bearer};
pub use visibility::{filter_for_listing, sort_courses};
