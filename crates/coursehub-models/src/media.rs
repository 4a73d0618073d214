//! Stored media blobs and upload responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::ids::{CourseId, MediaId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "media_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// MIME type prefix an upload of this kind must carry.
    pub const fn mime_prefix(self) -> &'static str {
        match self {
            MediaKind::Image => "image/",
            MediaKind::Video => "video/",
        }
    }

    pub const fn route_segment(self) -> &'static str {
        match self {
            MediaKind::Image => "images",
            MediaKind::Video => "videos",
        }
    }
}

/// Everything about a blob except its bytes.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct MediaMetadata {
    pub id: MediaId,
    pub kind: MediaKind,
    pub filename: String,
    pub original_name: String,
    pub content_type: String,
    pub course_id: Option<CourseId>,
    pub size_bytes: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MediaUploadResponse {
    pub id: MediaId,
    pub filename: String,
    pub url: String,
}

/// Multipart body accepted by the upload endpoints.
#[derive(ToSchema)]
pub struct MediaUploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    /// Video uploads only: course whose deletion should remove this blob
    #[schema(value_type = Option<String>, format = "uuid")]
    pub course_id: Option<String>,
}

/// Builds the stored filename: `<unix millis>-<name with whitespace as _>`.
pub fn storage_filename(original_name: &str, now: DateTime<Utc>) -> String {
    let cleaned: String = original_name
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() || c == '/' || c == '\\' { '_' } else { c })
        .collect();
    let cleaned = if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    };
    format!("{}-{}", now.timestamp_millis(), cleaned)
}
