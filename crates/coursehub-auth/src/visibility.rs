//! Shapes course collections for the public catalog and search.

use coursehub_models::{CatalogSort, Course, CourseWithAccess, Privacy};

use crate::entitlement::has_access;
use crate::identity::ResolvedIdentity;

/// Keeps only public courses, orders them, and annotates each with the
/// viewer's access. Applying it to its own output changes nothing.
pub fn filter_for_listing(
    identity: &ResolvedIdentity,
    courses: Vec<Course>,
    sort: CatalogSort,
) -> Vec<CourseWithAccess> {
    let mut listed: Vec<Course> = courses
        .into_iter()
        .filter(|c| c.privacy == Privacy::Public)
        .collect();

    sort_courses(&mut listed, sort);

    listed
        .into_iter()
        .map(|course| {
            let access = has_access(identity, &course);
            CourseWithAccess::new(course, access)
        })
        .collect()
}

/// Stable sort by creation time.
pub fn sort_courses(courses: &mut [Course], sort: CatalogSort) {
    match sort {
        CatalogSort::Newest => courses.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        CatalogSort::Oldest => courses.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
    }
}
