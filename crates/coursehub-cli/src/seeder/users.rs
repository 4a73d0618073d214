//! User seeding functionality.
//!
//! Seeded users hold the plain `user` capability and a few grants to seeded
//! courses.

use std::time::Instant;

use chrono::Utc;
use coursehub_core::Capability;
use coursehub_models::{CourseGrant, CourseId, GrantedBy, UserId};
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rayon::prelude::*;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use super::SEED_EMAIL_DOMAIN;
use super::models::UserSeed;

/// Recorded as the granter on every seeded grant.
pub fn seed_granter() -> GrantedBy {
    GrantedBy {
        user_id: UserId::from_uuid(Uuid::nil()),
        name: "Seeder".to_string(),
        email: format!("seeder@{SEED_EMAIL_DOMAIN}"),
    }
}

/// Generates users in parallel, each granted up to `grants_per_user` of `course_ids`.
pub fn generate_users(
    count: usize,
    course_ids: &[CourseId],
    grants_per_user: usize,
    password_hash: &str,
) -> Vec<UserSeed> {
    let granter = seed_granter();

    (0..count)
        .into_par_iter()
        .map(|idx| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();

            UserSeed {
                email: format!(
                    "{}.{}+{}@{}",
                    email_part(&first_name),
                    email_part(&last_name),
                    idx,
                    SEED_EMAIL_DOMAIN
                ),
                name: format!("{first_name} {last_name}"),
                password_hash: password_hash.to_string(),
                permissions: vec![Capability::User.as_str().to_string()],
                accessible_courses: pick_grants(course_ids, grants_per_user, &granter),
            }
        })
        .collect()
}

fn email_part(name: &str) -> String {
    let part: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    if part.is_empty() { "user".into() } else { part }
}

fn pick_grants(course_ids: &[CourseId], count: usize, granter: &GrantedBy) -> Vec<CourseGrant> {
    if course_ids.is_empty() {
        return Vec::new();
    }

    let mut picked: Vec<CourseId> = Vec::with_capacity(count);
    for _ in 0..count {
        let id = course_ids[(0..course_ids.len()).fake::<usize>()];
        if !picked.contains(&id) {
            picked.push(id);
        }
    }

    let now = Utc::now();
    picked
        .into_iter()
        .map(|course_id| CourseGrant {
            course_id,
            granted_by: granter.clone(),
            granted_at: now,
        })
        .collect()
}

/// Seeds users into the database.
pub async fn seed_users(
    db: &PgPool,
    count: usize,
    course_ids: &[CourseId],
    grants_per_user: usize,
    password_hash: &str,
) -> anyhow::Result<Vec<UserId>> {
    let start_time = Instant::now();
    println!(
        "👥 Seeding {} users (up to {} grants each)...",
        count, grants_per_user
    );

    let users = generate_users(count, course_ids, grants_per_user, password_hash);
    let ids = insert_users_batch(db, &users).await?;

    println!(
        "   ✓ Inserted {} users in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

/// Inserts users in batches using multi-value INSERT statements.
pub async fn insert_users_batch(db: &PgPool, users: &[UserSeed]) -> anyhow::Result<Vec<UserId>> {
    let mut tx = db.begin().await?;

    // 5 params per user
    const BATCH_SIZE: usize = 1000;
    let mut all_ids = Vec::with_capacity(users.len());

    for chunk in users.chunks(BATCH_SIZE) {
        all_ids.extend(insert_users_chunk(&mut tx, chunk).await?);
    }

    tx.commit().await?;
    Ok(all_ids)
}

async fn insert_users_chunk(
    tx: &mut Transaction<'_, Postgres>,
    users: &[UserSeed],
) -> anyhow::Result<Vec<UserId>> {
    if users.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = QueryBuilder::<Postgres>::new(
        "INSERT INTO users (name, email, password, permissions, accessible_courses) ",
    );
    query.push_values(users, |mut row, user| {
        row.push_bind(user.name.clone())
            .push_bind(user.email.clone())
            .push_bind(user.password_hash.clone())
            .push_bind(user.permissions.clone())
            .push_bind(Json(user.accessible_courses.clone()));
    });
    query.push(" ON CONFLICT (email) DO NOTHING RETURNING id");

    let ids = query
        .build_query_scalar::<UserId>()
        .fetch_all(&mut **tx)
        .await?;
    Ok(ids)
}

/// Deletes every user with a seed address.
pub async fn clear_users(db: &PgPool) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded users...");

    let result = sqlx::query("DELETE FROM users WHERE email LIKE $1")
        .bind(format!("%@{SEED_EMAIL_DOMAIN}"))
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} users in {:?}",
        result,
        start_time.elapsed()
    );

    Ok(result)
}
