//! Seed row shapes and seeding configuration.

use coursehub_models::{CourseGrant, Price, Privacy, Video};

/// Seed data for creating a course.
pub struct CourseSeed {
    pub title: String,
    pub description: String,
    pub instructor_name: String,
    pub image: String,
    pub privacy: Privacy,
    pub price: Price,
    pub videos: Vec<Video>,
}

/// Seed data for creating a user.
pub struct UserSeed {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub permissions: Vec<String>,
    pub accessible_courses: Vec<CourseGrant>,
}

/// Complete configuration for database seeding.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub num_courses: usize,
    pub num_users: usize,
    /// Upper bound; duplicates drawn for the same user collapse.
    pub grants_per_user: usize,
    pub videos_per_course: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            num_courses: 20,
            num_users: 50,
            grants_per_user: 2,
            videos_per_course: 4,
        }
    }
}

impl SeedConfig {
    /// Creates a new seed configuration with the specified number of courses.
    pub fn new(num_courses: usize) -> Self {
        Self {
            num_courses,
            ..Default::default()
        }
    }

    pub fn with_users(mut self, num_users: usize) -> Self {
        self.num_users = num_users;
        self
    }

    pub fn with_grants_per_user(mut self, grants: usize) -> Self {
        self.grants_per_user = grants;
        self
    }

    pub fn with_videos_per_course(mut self, videos: usize) -> Self {
        self.videos_per_course = videos;
        self
    }
}
