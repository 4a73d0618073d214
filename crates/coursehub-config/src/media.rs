use std::env;

use crate::env_or;

pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
pub const DEFAULT_MAX_VIDEO_BYTES: usize = 800 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct MediaConfig {
    /// Origin prefixed to absolute media links, without a trailing slash.
    pub public_base_url: String,
    pub max_image_bytes: usize,
    pub max_video_bytes: usize,
}

impl MediaConfig {
    pub fn from_env() -> Self {
        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string();

        Self {
            public_base_url,
            max_image_bytes: env_or("MEDIA_MAX_IMAGE_BYTES", DEFAULT_MAX_IMAGE_BYTES),
            max_video_bytes: env_or("MEDIA_MAX_VIDEO_BYTES", DEFAULT_MAX_VIDEO_BYTES),
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            public_base_url: "http://localhost:3000".to_string(),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            max_video_bytes: DEFAULT_MAX_VIDEO_BYTES,
        }
    }
}
