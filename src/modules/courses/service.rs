use anyhow::Context;
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::{info, instrument};

use coursehub_core::AppError;
use coursehub_models::{
    CatalogSort, Course, CourseId, CreateCourseDto, Price, UpdateCourseDto, Video,
    effective_privacy,
};
use coursehub_observability::track_course_created;

pub(crate) const COURSE_COLUMNS: &str = "id, title, description, instructor_name, image, privacy, price_cents, videos, created_at, updated_at";

/// Route prefix of uploaded videos; course deletion removes blobs linked this way.
const VIDEO_ROUTE: &str = "/api/media/videos/";

pub struct CourseService;

impl CourseService {
    #[instrument(skip(db))]
    pub async fn get_public_courses(db: &PgPool, sort: CatalogSort) -> Result<Vec<Course>, AppError> {
        let order = match sort {
            CatalogSort::Newest => "DESC",
            CatalogSort::Oldest => "ASC",
        };

        let courses = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE privacy = 'public' ORDER BY created_at {order}"
        ))
        .fetch_all(db)
        .await
        .context("Failed to fetch public courses")
        .map_err(AppError::database)?;

        Ok(courses)
    }

    #[instrument(skip(db))]
    pub async fn get_all_courses(db: &PgPool) -> Result<Vec<Course>, AppError> {
        let courses = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses ORDER BY created_at DESC"
        ))
        .fetch_all(db)
        .await
        .context("Failed to fetch courses")
        .map_err(AppError::database)?;

        Ok(courses)
    }

    #[instrument(skip(db))]
    pub async fn get_course(db: &PgPool, id: CourseId) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(&format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch course")
            .map_err(AppError::database)?
            .ok_or_else(course_not_found)
    }

    #[instrument(skip(db))]
    pub async fn create_course(db: &PgPool, dto: CreateCourseDto) -> Result<Course, AppError> {
        let price = dto.price.unwrap_or(Price::FREE);
        let privacy = effective_privacy(dto.privacy.unwrap_or_default(), price);

        let course = sqlx::query_as::<_, Course>(&format!(
            r#"INSERT INTO courses (title, description, instructor_name, image, privacy, price_cents, videos)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING {COURSE_COLUMNS}"#
        ))
        .bind(dto.title.trim())
        .bind(&dto.description)
        .bind(dto.instructor_name.trim())
        .bind(&dto.image)
        .bind(privacy)
        .bind(price)
        .bind(Json(&dto.videos))
        .fetch_one(db)
        .await
        .context("Failed to insert course")
        .map_err(AppError::database)?;

        track_course_created();
        info!(course_id = %course.id, privacy = ?course.privacy, "course created");

        Ok(course)
    }

    /// Partial update. Privacy is re-derived from the merged price, so a
    /// course that becomes paid also becomes private.
    #[instrument(skip(db))]
    pub async fn update_course(
        db: &PgPool,
        id: CourseId,
        dto: UpdateCourseDto,
    ) -> Result<Course, AppError> {
        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let existing = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to lock course")
        .map_err(AppError::database)?
        .ok_or_else(course_not_found)?;

        let price = dto.price.unwrap_or(existing.price);
        let privacy = effective_privacy(dto.privacy.unwrap_or(existing.privacy), price);
        let videos = dto.videos.unwrap_or(existing.videos.0);

        let course = sqlx::query_as::<_, Course>(&format!(
            r#"UPDATE courses
               SET title = $2, description = $3, instructor_name = $4, image = $5,
                   privacy = $6, price_cents = $7, videos = $8, updated_at = NOW()
               WHERE id = $1
               RETURNING {COURSE_COLUMNS}"#
        ))
        .bind(id)
        .bind(dto.title.as_deref().map(str::trim).unwrap_or(&existing.title))
        .bind(dto.description.as_deref().unwrap_or(&existing.description))
        .bind(
            dto.instructor_name
                .as_deref()
                .map(str::trim)
                .unwrap_or(&existing.instructor_name),
        )
        .bind(dto.image.as_deref().unwrap_or(&existing.image))
        .bind(privacy)
        .bind(price)
        .bind(Json(&videos))
        .fetch_one(&mut *tx)
        .await
        .context("Failed to update course")
        .map_err(AppError::database)?;

        tx.commit()
            .await
            .context("Failed to commit course update")
            .map_err(AppError::database)?;

        Ok(course)
    }

    #[instrument(skip(db))]
    pub async fn append_video(db: &PgPool, id: CourseId, video: Video) -> Result<Video, AppError> {
        let updated = sqlx::query_scalar::<_, CourseId>(
            "UPDATE courses SET videos = videos || $2::jsonb, updated_at = NOW() WHERE id = $1 RETURNING id",
        )
        .bind(id)
        .bind(Json(std::slice::from_ref(&video)))
        .fetch_optional(db)
        .await
        .context("Failed to append video")
        .map_err(AppError::database)?;

        match updated {
            Some(_) => Ok(video),
            None => Err(course_not_found()),
        }
    }

    #[instrument(skip(db))]
    pub async fn replace_videos(
        db: &PgPool,
        id: CourseId,
        videos: Vec<Video>,
    ) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(&format!(
            "UPDATE courses SET videos = $2, updated_at = NOW() WHERE id = $1 RETURNING {COURSE_COLUMNS}"
        ))
        .bind(id)
        .bind(Json(&videos))
        .fetch_optional(db)
        .await
        .context("Failed to replace videos")
        .map_err(AppError::database)?
        .ok_or_else(course_not_found)
    }

    /// Deletes the course and every uploaded video it links to. Blobs
    /// uploaded with this `course_id` go with it through the foreign key.
    #[instrument(skip(db))]
    pub async fn delete_course(db: &PgPool, id: CourseId) -> Result<(), AppError> {
        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let videos = sqlx::query_scalar::<_, Json<Vec<Video>>>(
            "SELECT videos FROM courses WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to lock course")
        .map_err(AppError::database)?
        .ok_or_else(course_not_found)?;

        let filenames = linked_video_filenames(&videos.0);
        let blobs_removed = if filenames.is_empty() {
            0
        } else {
            sqlx::query("DELETE FROM media_blobs WHERE kind = 'video' AND filename = ANY($1)")
                .bind(&filenames)
                .execute(&mut *tx)
                .await
                .context("Failed to delete linked videos")
                .map_err(AppError::database)?
                .rows_affected()
        };

        sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete course")
            .map_err(AppError::database)?;

        tx.commit()
            .await
            .context("Failed to commit course deletion")
            .map_err(AppError::database)?;

        info!(course_id = %id, blobs_removed, "course deleted");
        Ok(())
    }
}

fn course_not_found() -> AppError {
    AppError::not_found(anyhow::anyhow!("Course not found"))
}

/// Stored filenames of uploaded videos referenced by `videos`, in order,
/// without duplicates. External URLs are ignored.
fn linked_video_filenames(videos: &[Video]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for video in videos {
        let Some((_, rest)) = video.url.split_once(VIDEO_ROUTE) else {
            continue;
        };
        let name = rest.split(['?', '#']).next().unwrap_or_default();
        if !name.is_empty() && !name.contains('/') && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}
