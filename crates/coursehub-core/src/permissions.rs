//! Capability tags carried on user accounts.
//!
//! A user holds a non-empty set of capabilities. Tags are stored and sent
//! over the wire in their snake_case form (`"manage_courses"`).
//!
//! ```ignore
//! use coursehub_core::permissions::{Capability, COURSE_MUTATORS};
//!
//! let caps = Capability::normalize(vec![]);
//! assert_eq!(caps, vec![Capability::User]);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Admin,
    Instructor,
    User,
    ManageCourses,
    ManageInstructors,
}

/// Capabilities allowed to create, edit and delete courses and their media.
pub const COURSE_MUTATORS: &[Capability] = &[Capability::Admin, Capability::ManageCourses];

/// Capabilities allowed to edit other users' permissions and grants.
pub const USER_MUTATORS: &[Capability] = &[Capability::Admin];

impl Capability {
    pub const ALL: [Capability; 5] = [
        Capability::Admin,
        Capability::Instructor,
        Capability::User,
        Capability::ManageCourses,
        Capability::ManageInstructors,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Capability::Admin => "admin",
            Capability::Instructor => "instructor",
            Capability::User => "user",
            Capability::ManageCourses => "manage_courses",
            Capability::ManageInstructors => "manage_instructors",
        }
    }

    /// Deduplicates while keeping first-seen order; an empty set becomes `[user]`.
    pub fn normalize(capabilities: impl IntoIterator<Item = Capability>) -> Vec<Capability> {
        let mut out: Vec<Capability> = Vec::new();
        for cap in capabilities {
            if !out.contains(&cap) {
                out.push(cap);
            }
        }
        if out.is_empty() {
            out.push(Capability::User);
        }
        out
    }

    /// Parses stored tags, skipping any this build does not know.
    pub fn parse_stored<S: AsRef<str>>(tags: &[S]) -> Vec<Capability> {
        Self::normalize(tags.iter().filter_map(|t| t.as_ref().parse().ok()))
    }

    pub fn to_tags(capabilities: &[Capability]) -> Vec<String> {
        capabilities.iter().map(|c| c.as_str().to_string()).collect()
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCapability(pub String);

impl fmt::Display for UnknownCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown capability '{}'", self.0)
    }
}

impl std::error::Error for UnknownCapability {}

impl FromStr for Capability {
    type Err = UnknownCapability;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCapability(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_tag() {
        for cap in Capability::ALL {
            assert_eq!(cap.as_str().parse::<Capability>(), Ok(cap));
        }
    }

    #[test]
    fn test_unknown_tag_rejected() {
        assert!("superuser".parse::<Capability>().is_err());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&Capability::ManageCourses).unwrap();
        assert_eq!(json, r#""manage_courses""#);
    }

    #[test]
    fn test_normalize_empty_defaults_to_user() {
        assert_eq!(Capability::normalize(vec![]), vec![Capability::User]);
    }

    #[test]
    fn test_normalize_dedupes_in_order() {
        let caps = Capability::normalize(vec![
            Capability::ManageCourses,
            Capability::User,
            Capability::ManageCourses,
        ]);
        assert_eq!(caps, vec![Capability::ManageCourses, Capability::User]);
    }

    #[test]
    fn test_parse_stored_skips_unknown() {
        let caps = Capability::parse_stored(&["admin", "legacy_tag"]);
        assert_eq!(caps, vec![Capability::Admin]);

        let caps = Capability::parse_stored(&["legacy_tag"]);
        assert_eq!(caps, vec![Capability::User]);
    }

    #[test]
    fn test_mutator_sets_are_distinct() {
        assert!(COURSE_MUTATORS.contains(&Capability::ManageCourses));
        assert!(!USER_MUTATORS.contains(&Capability::ManageCourses));
    }
}
