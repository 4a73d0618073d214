//! Who may view a course, and who may change courses or users.
//!
//! Viewing is decided by the first matching rule:
//!
//! 1. the course is public and free
//! 2. the viewer is an admin
//! 3. the viewer holds a grant for the course
//!
//! Anything else is denied. Privacy and price are separate axes: a public
//! course that costs money is listed in the catalog but still gated.

use coursehub_core::permissions::{COURSE_MUTATORS, USER_MUTATORS};
use coursehub_models::{Course, CourseId, Price, Privacy};

use crate::identity::ResolvedIdentity;

/// The fields access decisions look at.
pub trait Gated {
    fn course_id(&self) -> CourseId;
    fn privacy(&self) -> Privacy;
    fn price(&self) -> Price;
}

impl Gated for Course {
    fn course_id(&self) -> CourseId {
        self.id
    }

    fn privacy(&self) -> Privacy {
        self.privacy
    }

    fn price(&self) -> Price {
        self.price
    }
}

/// Which rule decided an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessRule {
    OpenContent,
    AdminOverride,
    ExplicitGrant,
    Denied,
}

impl AccessRule {
    pub fn is_granted(self) -> bool {
        !matches!(self, AccessRule::Denied)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            AccessRule::OpenContent => "open_content",
            AccessRule::AdminOverride => "admin_override",
            AccessRule::ExplicitGrant => "explicit_grant",
            AccessRule::Denied => "denied",
        }
    }
}

pub fn access_rule<C: Gated + ?Sized>(identity: &ResolvedIdentity, course: &C) -> AccessRule {
    if course.privacy() == Privacy::Public && course.price().is_free() {
        AccessRule::OpenContent
    } else if identity.is_admin() {
        AccessRule::AdminOverride
    } else if identity.has_grant(course.course_id()) {
        AccessRule::ExplicitGrant
    } else {
        AccessRule::Denied
    }
}

pub fn has_access<C: Gated + ?Sized>(identity: &ResolvedIdentity, course: &C) -> bool {
    access_rule(identity, course).is_granted()
}

/// May create, edit or delete courses and their media.
pub fn can_mutate(identity: &ResolvedIdentity) -> bool {
    identity.has_any_capability(COURSE_MUTATORS)
}

/// May change other users' permissions and grants, or delete users.
pub fn can_mutate_users(identity: &ResolvedIdentity) -> bool {
    identity.has_any_capability(USER_MUTATORS)
}
