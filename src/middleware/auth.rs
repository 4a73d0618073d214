use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use coursehub_auth::{IdentityError, ResolvedIdentity};
use coursehub_core::AppError;
use coursehub_models::UserId;

use crate::state::AppState;

fn authorization_header(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

/// Identity for public surfaces. Any credential problem yields the anonymous
/// identity; only a failing user store rejects the request.
#[derive(Debug, Clone)]
pub struct OptionalIdentity(pub ResolvedIdentity);

impl FromRequestParts<AppState> for OptionalIdentity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = state
            .identity
            .resolve_optional(authorization_header(parts))
            .await
            .map_err(IdentityError::into_app_error)?;

        Ok(OptionalIdentity(identity))
    }
}

/// Extractor that requires a valid bearer token for a user that still exists.
/// Permissions and grants come from the store, not from the token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: UserId,
    pub identity: ResolvedIdentity,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = state
            .identity
            .resolve_required(authorization_header(parts))
            .await
            .map_err(IdentityError::into_app_error)?;

        let user_id = identity
            .user_id()
            .ok_or_else(|| AppError::unauthorized("Authentication required"))?;

        Ok(AuthUser { user_id, identity })
    }
}

/// Creates an extractor that authenticates and then applies one of the
/// mutation checks from `coursehub_auth::entitlement`.
#[macro_export]
macro_rules! require_capability {
    ($name:ident, $check:path, $message:literal) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = coursehub_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user =
                    $crate::middleware::auth::AuthUser::from_request_parts(parts, state).await?;

                if !$check(&auth_user.identity) {
                    tracing::debug!(user_id = %auth_user.user_id, extractor = stringify!($name), "permission denied");
                    return Err(coursehub_core::AppError::permission_denied($message));
                }

                Ok($name(auth_user))
            }
        }
    };
}

require_capability!(
    RequireCourseManager,
    coursehub_auth::can_mutate,
    "Requires the admin or manage_courses permission"
);
require_capability!(
    RequireUserAdmin,
    coursehub_auth::can_mutate_users,
    "Requires the admin permission"
);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header_value: Option<&[u8]>) -> Parts {
        let mut builder = Request::builder().uri("/api/courses");
        if let Some(value) = header_value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_authorization_header_present() {
        let parts = parts_with(Some(b"Bearer abc".as_slice()));
        assert_eq!(authorization_header(&parts), Some("Bearer abc"));
    }

    #[test]
    fn test_authorization_header_missing_or_not_text() {
        assert_eq!(authorization_header(&parts_with(None)), None);
        assert_eq!(authorization_header(&parts_with(Some(b"Bearer \xff".as_slice()))), None);
    }
}
