use std::ops::RangeInclusive;

use anyhow::Context;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{info, instrument};

use coursehub_config::MediaConfig;
use coursehub_core::AppError;
use coursehub_models::media::storage_filename;
use coursehub_models::{CourseId, MediaId, MediaKind, MediaMetadata, MediaUploadResponse};
use coursehub_observability::track_media_uploaded;

const METADATA_COLUMNS: &str = "id, kind, filename, original_name, content_type, course_id, octet_length(data)::BIGINT AS size_bytes, created_at";

/// A file pulled out of a multipart body.
#[derive(Debug)]
pub struct Upload {
    pub original_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

pub struct MediaService;

impl MediaService {
    /// Checks type and size against `kind` and stores the blob.
    #[instrument(skip(db, config, upload), fields(original_name = %upload.original_name, size = upload.data.len()))]
    pub async fn store(
        db: &PgPool,
        config: &MediaConfig,
        kind: MediaKind,
        upload: Upload,
        course_id: Option<CourseId>,
    ) -> Result<MediaUploadResponse, AppError> {
        validate_upload(config, kind, &upload)?;

        let filename = storage_filename(&upload.original_name, Utc::now());

        let metadata = sqlx::query_as::<_, MediaMetadata>(&format!(
            r#"INSERT INTO media_blobs (kind, filename, original_name, content_type, course_id, data)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING {METADATA_COLUMNS}"#
        ))
        .bind(kind)
        .bind(&filename)
        .bind(&upload.original_name)
        .bind(&upload.content_type)
        .bind(course_id)
        .bind(&upload.data)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    return AppError::bad_request(anyhow::anyhow!("Unknown course id"));
                }
                if db_err.is_unique_violation() {
                    return AppError::conflict("A file with this name was just uploaded, retry");
                }
            }
            AppError::database(anyhow::Error::new(e).context("Failed to store media"))
        })?;

        track_media_uploaded(kind.route_segment());
        info!(media_id = %metadata.id, filename = %metadata.filename, "media stored");

        Ok(MediaUploadResponse {
            url: public_url(config, &metadata),
            id: metadata.id,
            filename: metadata.filename,
        })
    }

    /// Looks a blob up by id, or by stored filename when `key` is not an id.
    #[instrument(skip(db))]
    pub async fn find(db: &PgPool, kind: MediaKind, key: &str) -> Result<MediaMetadata, AppError> {
        let by_id = key.parse::<MediaId>().ok();
        let sql = format!(
            "SELECT {METADATA_COLUMNS} FROM media_blobs WHERE {} = $1 AND kind = $2",
            if by_id.is_some() { "id" } else { "filename" }
        );

        let query = sqlx::query_as::<_, MediaMetadata>(&sql);
        let query = match by_id {
            Some(id) => query.bind(id),
            None => query.bind(key),
        };

        query
            .bind(kind)
            .fetch_optional(db)
            .await
            .context("Failed to fetch media metadata")
            .map_err(AppError::database)?
            .ok_or_else(media_not_found)
    }

    #[instrument(skip(db))]
    pub async fn read_all(db: &PgPool, id: MediaId) -> Result<Vec<u8>, AppError> {
        sqlx::query_scalar::<_, Vec<u8>>("SELECT data FROM media_blobs WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to read media")
            .map_err(AppError::database)?
            .ok_or_else(media_not_found)
    }

    /// Reads only the requested slice; the rest of the blob never leaves the database.
    #[instrument(skip(db))]
    pub async fn read_range(
        db: &PgPool,
        id: MediaId,
        range: &RangeInclusive<u64>,
    ) -> Result<Vec<u8>, AppError> {
        // substring() is 1-based and takes int4 arguments
        let from = i32::try_from(*range.start() + 1).context("Range start out of bounds")?;
        let count = i32::try_from(range.end() - range.start() + 1).context("Range too large")?;

        sqlx::query_scalar::<_, Vec<u8>>(
            "SELECT substring(data FROM $2 FOR $3) FROM media_blobs WHERE id = $1",
        )
        .bind(id)
        .bind(from)
        .bind(count)
        .fetch_optional(db)
        .await
        .context("Failed to read media range")
        .map_err(AppError::database)?
        .ok_or_else(media_not_found)
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, kind: MediaKind, id: MediaId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM media_blobs WHERE id = $1 AND kind = $2")
            .bind(id)
            .bind(kind)
            .execute(db)
            .await
            .context("Failed to delete media")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(media_not_found());
        }
        Ok(())
    }
}

fn media_not_found() -> AppError {
    AppError::not_found(anyhow::anyhow!("Media not found"))
}

fn validate_upload(config: &MediaConfig, kind: MediaKind, upload: &Upload) -> Result<(), AppError> {
    if upload.data.is_empty() {
        return Err(AppError::bad_request(anyhow::anyhow!("Uploaded file is empty")));
    }

    if !upload.content_type.starts_with(kind.mime_prefix()) {
        return Err(AppError::bad_request(anyhow::anyhow!(
            "Expected a {}* file, got '{}'",
            kind.mime_prefix(),
            upload.content_type
        )));
    }

    let max = match kind {
        MediaKind::Image => config.max_image_bytes,
        MediaKind::Video => config.max_video_bytes,
    };
    if upload.data.len() > max {
        return Err(AppError::payload_too_large(format!(
            "File exceeds the {max} byte limit"
        )));
    }

    Ok(())
}

/// Images are linked by id; videos by filename so course video lists can be
/// matched back to their blobs.
fn public_url(config: &MediaConfig, metadata: &MediaMetadata) -> String {
    let key = match metadata.kind {
        MediaKind::Image => metadata.id.to_string(),
        MediaKind::Video => metadata.filename.clone(),
    };
    format!(
        "{}/api/media/{}/{}",
        config.public_base_url,
        metadata.kind.route_segment(),
        key
    )
}
