//! Signup, login and session DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::users::User;
use crate::value_types::Email;

#[derive(Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 200, message = "name is required"))]
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    pub email: Email,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    #[schema(example = "correct-horse-battery")]
    pub password: String,
}

#[derive(Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    pub email: Email,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

// Passwords stay out of logs.
impl std::fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_password_length() {
        let req: SignupRequest = serde_json::from_value(serde_json::json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "short"
        }))
        .unwrap();
        assert!(req.validate().is_err());

        let req: SignupRequest = serde_json::from_value(serde_json::json!({
            "name": "Ada",
            "email": "ADA@example.com",
            "password": "long-enough"
        }))
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.email.as_str(), "ada@example.com");
    }

    #[test]
    fn test_debug_hides_password() {
        let req: LoginRequest = serde_json::from_value(serde_json::json!({
            "email": "ada@example.com",
            "password": "hunter2hunter2"
        }))
        .unwrap();
        assert!(!format!("{req:?}").contains("hunter2"));
    }
}
