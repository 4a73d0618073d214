//! Fake data for local development.
//!
//! [`seed_all`] inserts courses first, then users granted to some of them.
//! [`clear_all`] removes only rows the seeder created.

pub mod courses;
pub mod models;
pub mod users;

use std::time::Instant;

use coursehub_core::hash_password;
use sqlx::PgPool;

pub use models::{CourseSeed, SeedConfig, UserSeed};

/// Every seeded user's address ends with this domain.
pub const SEED_EMAIL_DOMAIN: &str = "seed.example.com";

/// Every seeded course's thumbnail starts with this prefix.
pub const SEED_IMAGE_PREFIX: &str = "https://cdn.seed.example.com/thumbnails/";

/// Password shared by all seeded users.
pub const SEED_PASSWORD: &str = "password123";

pub async fn seed_all(db: &PgPool, config: SeedConfig) -> anyhow::Result<()> {
    let start_time = Instant::now();
    println!("🌱 Seeding database...\n");

    let course_ids =
        courses::seed_courses(db, config.num_courses, config.videos_per_course).await?;

    let password_hash = hash_password(SEED_PASSWORD).map_err(|e| e.error)?;
    let user_ids = users::seed_users(
        db,
        config.num_users,
        &course_ids,
        config.grants_per_user,
        &password_hash,
    )
    .await?;

    println!(
        "\n✅ Seeded {} courses and {} users in {:?}",
        course_ids.len(),
        user_ids.len(),
        start_time.elapsed()
    );
    println!("   Seeded users log in with password: {SEED_PASSWORD}");

    Ok(())
}

/// Removes seeded users and courses. Accounts created any other way stay.
pub async fn clear_all(db: &PgPool) -> anyhow::Result<()> {
    let start_time = Instant::now();

    let users = users::clear_users(db).await?;
    let courses = courses::clear_courses(db).await?;

    println!(
        "\n✅ Cleared {} users and {} courses in {:?}",
        users,
        courses,
        start_time.elapsed()
    );

    Ok(())
}
