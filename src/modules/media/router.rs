use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use coursehub_config::MediaConfig;

use crate::state::AppState;

use super::controller::{delete_video, get_image, get_video, upload_image, upload_video};

/// Multipart framing on top of the largest accepted file.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn init_media_router(config: &MediaConfig) -> Router<AppState> {
    let images = Router::new()
        .route("/", post(upload_image))
        .route("/{id}", get(get_image))
        .layer(DefaultBodyLimit::max(
            config.max_image_bytes + MULTIPART_OVERHEAD,
        ));

    let videos = Router::new()
        .route("/", post(upload_video))
        .route("/{key}", get(get_video).delete(delete_video))
        .layer(DefaultBodyLimit::max(
            config.max_video_bytes + MULTIPART_OVERHEAD,
        ));

    Router::new().nest("/images", images).nest("/videos", videos)
}
