//! JWT claim structure for session tokens.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims embedded in a session token.
///
/// `permissions` is a snapshot taken at login for client convenience.
/// Authorization never trusts it: every request re-reads the user's
/// capabilities and grants from the store.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Expiration (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_serialize() {
        let claims = Claims {
            sub: "user-id-123".to_string(),
            email: "test@example.com".to_string(),
            permissions: vec!["manage_courses".to_string()],
            exp: 1234567890,
            iat: 1234567800,
        };
        let serialized = serde_json::to_string(&claims).unwrap();
        assert!(serialized.contains(r#""sub":"user-id-123""#));
        assert!(serialized.contains(r#""permissions":["manage_courses"]"#));
    }

    #[test]
    fn test_claims_deserialize_without_permissions() {
        let json = r#"{"sub":"user-id-456","email":"user@test.com","exp":9999999999,"iat":9999999900}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.sub, "user-id-456");
        assert!(claims.permissions.is_empty());
        assert_eq!(claims.exp, 9999999999);
    }
}
