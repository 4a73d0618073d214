use axum::{
    Json,
    body::Body,
    extract::{Multipart, Path, State, multipart::MultipartError},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use axum_extra::{TypedHeader, headers::Range};
use tracing::{debug, instrument};

use coursehub_core::{AppError, ErrorResponse, errors::codes};
use coursehub_models::{CourseId, MediaId, MediaKind, MediaUploadForm, MediaUploadResponse};

use crate::middleware::auth::RequireCourseManager;
use crate::state::AppState;

use super::range::{content_range, resolve_byte_range, unsatisfied_content_range};
use super::service::{MediaService, Upload};

const IMMUTABLE_CACHE: &str = "public, max-age=31536000, immutable";

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::payload_too_large("Upload exceeds the size limit");
    }
    AppError::bad_request(anyhow::anyhow!("Invalid multipart body: {}", err.body_text()))
}

/// Reads the `file` part and, if present, a `course_id` part.
async fn read_upload(mut multipart: Multipart) -> Result<(Upload, Option<CourseId>), AppError> {
    let mut upload = None;
    let mut course_id = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some("file") => {
                let original_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(multipart_error)?;
                upload = Some(Upload {
                    original_name,
                    content_type,
                    data: data.to_vec(),
                });
            }
            Some("course_id") => {
                let raw = field.text().await.map_err(multipart_error)?;
                if !raw.trim().is_empty() {
                    let id = raw
                        .parse::<CourseId>()
                        .map_err(|_| AppError::bad_request(anyhow::anyhow!("course_id is not a valid id")))?;
                    course_id = Some(id);
                }
            }
            _ => {}
        }
    }

    let upload =
        upload.ok_or_else(|| AppError::bad_request(anyhow::anyhow!("file is required")))?;
    Ok((upload, course_id))
}

/// Upload a course image
#[utoipa::path(
    post,
    path = "/api/media/images",
    request_body(content = MediaUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Image stored", body = MediaUploadResponse),
        (status = 400, description = "Missing file or not an image", body = ErrorResponse),
        (status = 401, description = "Unauthenticated or missing course permission", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Media"
)]
#[instrument(skip(state, multipart))]
pub async fn upload_image(
    State(state): State<AppState>,
    _manager: RequireCourseManager,
    multipart: Multipart,
) -> Result<(StatusCode, Json<MediaUploadResponse>), AppError> {
    let (upload, _) = read_upload(multipart).await?;
    let response =
        MediaService::store(&state.db, &state.media_config, MediaKind::Image, upload, None).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Upload a course video
///
/// Pass `course_id` to have the video removed when that course is deleted.
#[utoipa::path(
    post,
    path = "/api/media/videos",
    request_body(content = MediaUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Video stored", body = MediaUploadResponse),
        (status = 400, description = "Missing file, not a video, or unknown course", body = ErrorResponse),
        (status = 401, description = "Unauthenticated or missing course permission", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Media"
)]
#[instrument(skip(state, multipart))]
pub async fn upload_video(
    State(state): State<AppState>,
    _manager: RequireCourseManager,
    multipart: Multipart,
) -> Result<(StatusCode, Json<MediaUploadResponse>), AppError> {
    let (upload, course_id) = read_upload(multipart).await?;
    let response = MediaService::store(
        &state.db,
        &state.media_config,
        MediaKind::Video,
        upload,
        course_id,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Image bytes with a long-lived cache header
#[utoipa::path(
    get,
    path = "/api/media/images/{id}",
    params(("id" = String, Path, description = "Image ID")),
    responses(
        (status = 200, description = "Image bytes"),
        (status = 404, description = "Image not found", body = ErrorResponse)
    ),
    tag = "Media"
)]
#[instrument(skip(state))]
pub async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let metadata = MediaService::find(&state.db, MediaKind::Image, &id).await?;
    let data = MediaService::read_all(&state.db, metadata.id).await?;

    Ok((
        [
            (header::CONTENT_TYPE, metadata.content_type),
            (header::CACHE_CONTROL, IMMUTABLE_CACHE.to_string()),
        ],
        data,
    )
        .into_response())
}

/// Video bytes by id or stored filename
///
/// Honours a single `Range: bytes=` request with 206, or 416 when it cannot
/// be satisfied. Without `Range` the whole file is returned.
#[utoipa::path(
    get,
    path = "/api/media/videos/{key}",
    params(
        ("key" = String, Path, description = "Video ID or stored filename"),
        ("Range" = Option<String>, Header, description = "e.g. bytes=0-1048575")
    ),
    responses(
        (status = 200, description = "Whole video"),
        (status = 206, description = "Requested slice"),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 416, description = "Range not satisfiable", body = ErrorResponse)
    ),
    tag = "Media"
)]
#[instrument(skip(state, range))]
pub async fn get_video(
    State(state): State<AppState>,
    Path(key): Path<String>,
    range: Option<TypedHeader<Range>>,
) -> Result<Response, AppError> {
    let metadata = MediaService::find(&state.db, MediaKind::Video, &key).await?;
    let len = u64::try_from(metadata.size_bytes).unwrap_or_default();

    let Some(TypedHeader(range)) = range else {
        let data = MediaService::read_all(&state.db, metadata.id).await?;
        return Ok((
            [
                (header::CONTENT_TYPE, metadata.content_type),
                (header::ACCEPT_RANGES, "bytes".to_string()),
            ],
            data,
        )
            .into_response());
    };

    let Some(slice) = range
        .satisfiable_ranges(len)
        .next()
        .and_then(|bounds| resolve_byte_range(bounds, len))
    else {
        debug!(media_id = %metadata.id, len, "unsatisfiable range");
        let mut response = AppError::new(
            StatusCode::RANGE_NOT_SATISFIABLE,
            codes::RANGE_NOT_SATISFIABLE,
            anyhow::anyhow!("Requested range not satisfiable"),
        )
        .into_response();
        if let Ok(value) = unsatisfied_content_range(len).parse() {
            response.headers_mut().insert(header::CONTENT_RANGE, value);
        }
        return Ok(response);
    };

    let data = MediaService::read_range(&state.db, metadata.id, &slice).await?;

    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(header::CONTENT_TYPE, metadata.content_type)
        .header(header::ACCEPT_RANGES, "bytes")
        .header(header::CONTENT_RANGE, content_range(&slice, len))
        .header(header::CONTENT_LENGTH, data.len())
        .body(Body::from(data))
        .map_err(AppError::internal)
}

#[utoipa::path(
    delete,
    path = "/api/media/videos/{key}",
    params(("key" = String, Path, description = "Video ID")),
    responses(
        (status = 204, description = "Video deleted"),
        (status = 401, description = "Unauthenticated or missing course permission", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Media"
)]
#[instrument(skip(state))]
pub async fn delete_video(
    State(state): State<AppState>,
    _manager: RequireCourseManager,
    Path(id): Path<MediaId>,
) -> Result<StatusCode, AppError> {
    MediaService::delete(&state.db, MediaKind::Video, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
