//! The per-request view of who is asking.

use std::collections::HashSet;

use coursehub_core::Capability;
use coursehub_models::{CourseId, UserId};

/// Identity resolved for one request.
///
/// Built fresh from the user store on every request and dropped with it;
/// grants revoked a moment ago are already absent here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedIdentity {
    user_id: Option<UserId>,
    permissions: HashSet<Capability>,
    accessible_course_ids: HashSet<CourseId>,
}

impl ResolvedIdentity {
    /// No credential: no permissions, no grants.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(
        user_id: UserId,
        permissions: impl IntoIterator<Item = Capability>,
        accessible_course_ids: impl IntoIterator<Item = CourseId>,
    ) -> Self {
        Self {
            user_id: Some(user_id),
            permissions: permissions.into_iter().collect(),
            accessible_course_ids: accessible_course_ids.into_iter().collect(),
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    pub fn is_anonymous(&self) -> bool {
        self.user_id.is_none()
    }

    pub fn is_admin(&self) -> bool {
        self.has_capability(Capability::Admin)
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.permissions.contains(&capability)
    }

    pub fn has_any_capability(&self, capabilities: &[Capability]) -> bool {
        capabilities.iter().any(|c| self.has_capability(*c))
    }

    pub fn has_grant(&self, course_id: CourseId) -> bool {
        self.accessible_course_ids.contains(&course_id)
    }

    pub fn permissions(&self) -> &HashSet<Capability> {
        &self.permissions
    }

    pub fn accessible_course_ids(&self) -> &HashSet<CourseId> {
        &self.accessible_course_ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_has_nothing() {
        let anon = ResolvedIdentity::anonymous();
        assert!(anon.is_anonymous());
        assert!(!anon.is_admin());
        assert!(anon.permissions().is_empty());
        assert!(anon.accessible_course_ids().is_empty());
        assert!(!anon.has_grant(CourseId::new()));
    }

    #[test]
    fn test_authenticated_lookup() {
        let course = CourseId::new();
        let id = ResolvedIdentity::authenticated(
            UserId::new(),
            [Capability::User, Capability::Admin],
            [course],
        );
        assert!(!id.is_anonymous());
        assert!(id.is_admin());
        assert!(id.has_any_capability(&[Capability::ManageCourses, Capability::Admin]));
        assert!(!id.has_any_capability(&[Capability::ManageInstructors]));
        assert!(id.has_grant(course));
    }
}
