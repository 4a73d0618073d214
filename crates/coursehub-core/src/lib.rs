//! # Coursehub Core
//!
//! Foundational types shared by every Coursehub crate:
//!
//! - [`errors`]: [`AppError`] and its JSON error body
//! - [`pagination`]: page/limit query parameters and response metadata
//! - [`password`]: bcrypt hashing and verification
//! - [`permissions`]: capability tags held by users
//!
//! # Example
//!
//! ```ignore
//! use coursehub_core::errors::AppError;
//! use coursehub_core::password::{hash_password, verify_password};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Course not found"));
//! let hash = hash_password("secure_password")?;
//! assert!(verify_password("secure_password", &hash));
//! ```

pub mod errors;
pub mod pagination;
pub mod password;
pub mod permissions;

pub use errors::{AppError, ErrorResponse};
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_password};
pub use permissions::Capability;
