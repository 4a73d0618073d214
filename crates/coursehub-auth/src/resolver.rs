//! Turns an `Authorization` header into a [`ResolvedIdentity`].
//!
//! Two entry points with different failure behaviour:
//!
//! - [`IdentityResolver::resolve_optional`] serves public surfaces. Any
//!   credential problem (missing, malformed, bad signature, expired, user
//!   gone) yields the anonymous identity.
//! - [`IdentityResolver::resolve_required`] serves authenticated surfaces and
//!   reports the same problems as [`IdentityError`].
//!
//! Either way, store failures propagate; they are never mistaken for an
//! anonymous caller.

use std::future::Future;

use coursehub_config::JwtConfig;
use coursehub_core::{AppError, Capability};
use coursehub_models::{CourseId, UserId};
use thiserror::Error;
use tracing::debug;

use crate::identity::ResolvedIdentity;
use crate::jwt::verify_token;

/// What the resolver needs to know about a user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserEntitlements {
    pub permissions: Vec<Capability>,
    pub accessible_course_ids: Vec<CourseId>,
}

/// Point lookup of a user's current capabilities and grants.
pub trait UserDirectory: Send + Sync {
    /// `Ok(None)` when the user does not exist.
    fn load_entitlements(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = anyhow::Result<Option<UserEntitlements>>> + Send;
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Missing authorization header")]
    MissingCredential,
    #[error("Invalid authorization header format")]
    MalformedCredential,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("User no longer exists")]
    UnknownUser,
    #[error("Failed to load user entitlements")]
    Store(#[source] anyhow::Error),
}

impl IdentityError {
    /// True for problems with the caller's credential, false for store failures.
    pub fn is_credential_failure(&self) -> bool {
        !matches!(self, IdentityError::Store(_))
    }

    pub fn into_app_error(self) -> AppError {
        match self {
            IdentityError::Store(err) => AppError::database(err),
            other => AppError::unauthorized(other.to_string()),
        }
    }
}

/// Extracts the token from `Bearer <token>`.
pub fn parse_bearer(header: Option<&str>) -> Result<&str, IdentityError> {
    let header = header.ok_or(IdentityError::MissingCredential)?;
    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(IdentityError::MalformedCredential)?;
    if token.is_empty() {
        return Err(IdentityError::MalformedCredential);
    }
    Ok(token)
}

#[derive(Debug, Clone)]
pub struct IdentityResolver<D> {
    jwt_config: JwtConfig,
    directory: D,
}

impl<D: UserDirectory> IdentityResolver<D> {
    pub fn new(jwt_config: JwtConfig, directory: D) -> Self {
        Self {
            jwt_config,
            directory,
        }
    }

    pub fn jwt_config(&self) -> &JwtConfig {
        &self.jwt_config
    }

    pub async fn resolve_required(
        &self,
        header: Option<&str>,
    ) -> Result<ResolvedIdentity, IdentityError> {
        let token = parse_bearer(header)?;
        let claims =
            verify_token(token, &self.jwt_config).map_err(|_| IdentityError::InvalidToken)?;
        let user_id: UserId = claims
            .sub
            .parse()
            .map_err(|_| IdentityError::InvalidToken)?;

        let entitlements = self
            .directory
            .load_entitlements(user_id)
            .await
            .map_err(IdentityError::Store)?
            .ok_or(IdentityError::UnknownUser)?;

        Ok(ResolvedIdentity::authenticated(
            user_id,
            Capability::normalize(entitlements.permissions),
            entitlements.accessible_course_ids,
        ))
    }

    /// Never fails on credential problems. Only a store failure is an error.
    pub async fn resolve_optional(
        &self,
        header: Option<&str>,
    ) -> Result<ResolvedIdentity, IdentityError> {
        match self.resolve_required(header).await {
            Ok(identity) => Ok(identity),
            Err(err) if err.is_credential_failure() => {
                if header.is_some() {
                    debug!(reason = %err, "credential rejected, continuing as anonymous");
                }
                Ok(ResolvedIdentity::anonymous())
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::create_access_token;
    use crate::jwt::tests::get_test_jwt_config;
    use coursehub_models::Email;
    use std::collections::HashMap;

    #[derive(Default)]
    struct InMemoryDirectory {
        users: HashMap<UserId, UserEntitlements>,
        fail: bool,
    }

    impl UserDirectory for InMemoryDirectory {
        async fn load_entitlements(
            &self,
            user_id: UserId,
        ) -> anyhow::Result<Option<UserEntitlements>> {
            if self.fail {
                anyhow::bail!("connection refused");
            }
            Ok(self.users.get(&user_id).cloned())
        }
    }

    fn token_for(user_id: UserId, config: &JwtConfig) -> String {
        let email = Email::new("viewer@example.com").unwrap();
        let token = create_access_token(user_id, &email, &[Capability::User], config).unwrap();
        format!("Bearer {token}")
    }

    fn resolver_with(
        user_id: UserId,
        entitlements: UserEntitlements,
    ) -> IdentityResolver<InMemoryDirectory> {
        let mut directory = InMemoryDirectory::default();
        directory.users.insert(user_id, entitlements);
        IdentityResolver::new(get_test_jwt_config(), directory)
    }

    #[test]
    fn test_parse_bearer() {
        assert!(matches!(
            parse_bearer(None),
            Err(IdentityError::MissingCredential)
        ));
        assert!(matches!(
            parse_bearer(Some("Basic abc")),
            Err(IdentityError::MalformedCredential)
        ));
        assert!(matches!(
            parse_bearer(Some("Bearer   ")),
            Err(IdentityError::MalformedCredential)
        ));
        assert_eq!(parse_bearer(Some("Bearer abc.def")).unwrap(), "abc.def");
    }

    #[tokio::test]
    async fn test_required_loads_fresh_entitlements() {
        let user_id = UserId::new();
        let course = CourseId::new();
        let resolver = resolver_with(
            user_id,
            UserEntitlements {
                permissions: vec![Capability::ManageCourses],
                accessible_course_ids: vec![course],
            },
        );
        let header = token_for(user_id, resolver.jwt_config());

        let identity = resolver.resolve_required(Some(&header)).await.unwrap();
        assert_eq!(identity.user_id(), Some(user_id));
        // The token says `user`; the store says `manage_courses`. The store wins.
        assert!(identity.has_capability(Capability::ManageCourses));
        assert!(!identity.has_capability(Capability::User));
        assert!(identity.has_grant(course));
    }

    #[tokio::test]
    async fn test_empty_stored_permissions_become_user() {
        let user_id = UserId::new();
        let resolver = resolver_with(user_id, UserEntitlements::default());
        let header = token_for(user_id, resolver.jwt_config());

        let identity = resolver.resolve_required(Some(&header)).await.unwrap();
        assert!(identity.has_capability(Capability::User));
    }

    #[tokio::test]
    async fn test_credential_failures() {
        let user_id = UserId::new();
        let resolver = resolver_with(user_id, UserEntitlements::default());

        let other_secret = JwtConfig::new("some-other-secret-that-is-long-enough", 3600);
        let forged = token_for(user_id, &other_secret);
        let deleted_user = token_for(UserId::new(), resolver.jwt_config());

        let cases: Vec<Option<&str>> = vec![
            None,
            Some("Token abc"),
            Some("Bearer not-a-jwt"),
            Some(forged.as_str()),
            Some(deleted_user.as_str()),
        ];

        for header in cases {
            let err = resolver.resolve_required(header).await.unwrap_err();
            assert!(err.is_credential_failure(), "{header:?} -> {err}");
            assert_eq!(err.into_app_error().status.as_u16(), 401);

            let identity = resolver.resolve_optional(header).await.unwrap();
            assert!(identity.is_anonymous(), "{header:?}");
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_not_anonymous() {
        let user_id = UserId::new();
        let resolver = IdentityResolver::new(
            get_test_jwt_config(),
            InMemoryDirectory {
                users: HashMap::new(),
                fail: true,
            },
        );
        let header = token_for(user_id, resolver.jwt_config());

        let err = resolver.resolve_optional(Some(&header)).await.unwrap_err();
        assert!(!err.is_credential_failure());
        assert_eq!(err.into_app_error().status.as_u16(), 500);
    }

    #[tokio::test]
    async fn test_optional_without_header_skips_store() {
        let resolver = IdentityResolver::new(
            get_test_jwt_config(),
            InMemoryDirectory {
                users: HashMap::new(),
                fail: true,
            },
        );
        let identity = resolver.resolve_optional(None).await.unwrap();
        assert!(identity.is_anonymous());
    }
}
