//! Course seeding functionality.
//!
//! Generates fake courses in parallel and inserts them in batches.

use std::time::Instant;

use coursehub_models::{CourseId, Price, Privacy, Video, effective_privacy};
use fake::Fake;
use fake::faker::lorem::en::{Paragraph, Sentence, Words};
use fake::faker::name::en::Name;
use rayon::prelude::*;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

use super::SEED_IMAGE_PREFIX;
use super::models::CourseSeed;

const PRIVACY_TIERS: [Privacy; 3] = [Privacy::Public, Privacy::Unlisted, Privacy::Private];

/// Generates course data in parallel using Rayon.
///
/// Roughly half the courses are free. Paid ones always come out private.
pub fn generate_courses(count: usize, videos_per_course: usize) -> Vec<CourseSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| generate_course(idx, videos_per_course))
        .collect()
}

fn generate_course(idx: usize, videos_per_course: usize) -> CourseSeed {
    let title: String = Sentence(2..5).fake();
    let title = title.trim_end_matches('.').to_string();
    let slug = slugify(&title);

    let price = if (0..2u8).fake::<u8>() == 0 {
        Price::FREE
    } else {
        Price::from_cents((499..19999i64).fake::<i64>()).unwrap_or_default()
    };
    let requested = PRIVACY_TIERS[(0..PRIVACY_TIERS.len()).fake::<usize>()];

    let videos = (0..videos_per_course)
        .map(|n| {
            let words: Vec<String> = Words(2..5).fake();
            Video {
                title: format!("Lesson {}: {}", n + 1, words.join(" ")),
                url: format!("https://cdn.seed.example.com/videos/{slug}-{idx}-{n}.mp4"),
                bio: Sentence(5..12).fake(),
            }
        })
        .collect();

    CourseSeed {
        title,
        description: Paragraph(2..4).fake(),
        instructor_name: Name().fake(),
        image: format!("{SEED_IMAGE_PREFIX}{slug}-{idx}.png"),
        privacy: effective_privacy(requested, price),
        price,
        videos,
    }
}

fn slugify(title: &str) -> String {
    title
        .split_whitespace()
        .map(|w| {
            w.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Seeds courses into the database.
pub async fn seed_courses(
    db: &PgPool,
    count: usize,
    videos_per_course: usize,
) -> anyhow::Result<Vec<CourseId>> {
    let start_time = Instant::now();
    println!("📚 Seeding {} courses...", count);

    let courses = generate_courses(count, videos_per_course);
    let ids = insert_courses_batch(db, &courses).await?;

    println!(
        "   ✓ Inserted {} courses in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

/// Inserts courses in batches using multi-value INSERT statements.
pub async fn insert_courses_batch(
    db: &PgPool,
    courses: &[CourseSeed],
) -> anyhow::Result<Vec<CourseId>> {
    let mut tx = db.begin().await?;

    // 7 params per course
    const BATCH_SIZE: usize = 1000;
    let mut all_ids = Vec::with_capacity(courses.len());

    for chunk in courses.chunks(BATCH_SIZE) {
        all_ids.extend(insert_courses_chunk(&mut tx, chunk).await?);
    }

    tx.commit().await?;
    Ok(all_ids)
}

async fn insert_courses_chunk(
    tx: &mut Transaction<'_, Postgres>,
    courses: &[CourseSeed],
) -> anyhow::Result<Vec<CourseId>> {
    if courses.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = QueryBuilder::<Postgres>::new(
        "INSERT INTO courses (title, description, instructor_name, image, privacy, price_cents, videos) ",
    );
    query.push_values(courses, |mut row, course| {
        row.push_bind(course.title.clone())
            .push_bind(course.description.clone())
            .push_bind(course.instructor_name.clone())
            .push_bind(course.image.clone())
            .push_bind(course.privacy)
            .push_bind(course.price)
            .push_bind(Json(course.videos.clone()));
    });
    query.push(" RETURNING id");

    let ids = query
        .build_query_scalar::<CourseId>()
        .fetch_all(&mut **tx)
        .await?;
    Ok(ids)
}

/// Deletes every course whose thumbnail lives under the seed prefix.
pub async fn clear_courses(db: &PgPool) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded courses...");

    let result = sqlx::query("DELETE FROM courses WHERE image LIKE $1")
        .bind(format!("{SEED_IMAGE_PREFIX}%"))
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} courses in {:?}",
        result,
        start_time.elapsed()
    );

    Ok(result)
}
