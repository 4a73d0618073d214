//! Courses, their embedded video lists, and course write DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::ids::CourseId;
use crate::value_types::Price;

/// Discoverability tier. Independent of price: it decides where a course is
/// listed, not who may watch it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[sqlx(type_name = "course_privacy", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    /// Listed in the catalog and search.
    Public,
    /// Reachable by direct link only.
    Unlisted,
    /// Reachable by direct link or the admin listing only.
    #[default]
    Private,
}

/// Courses that cost money are never publicly listed.
pub fn effective_privacy(requested: Privacy, price: Price) -> Privacy {
    if price.is_free() {
        requested
    } else {
        Privacy::Private
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
pub struct Video {
    #[validate(length(min = 1, message = "video title is required"))]
    pub title: String,
    /// Omitted from responses when the viewer has no access to the course.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    #[validate(url(message = "video url must be an absolute URL"))]
    pub url: String,
    #[serde(default)]
    pub bio: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub instructor_name: String,
    /// Thumbnail URL
    pub image: String,
    pub privacy: Privacy,
    #[sqlx(rename = "price_cents")]
    pub price: Price,
    #[schema(value_type = Vec<Video>)]
    pub videos: Json<Vec<Video>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// Strips every video URL, leaving titles and descriptions browsable.
    pub fn redact_video_urls(&mut self) {
        for video in self.videos.0.iter_mut() {
            video.url.clear();
        }
    }
}

/// A course as shown to a particular viewer.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CourseWithAccess {
    #[serde(flatten)]
    pub course: Course,
    pub has_access: bool,
}

impl CourseWithAccess {
    pub fn new(mut course: Course, has_access: bool) -> Self {
        if !has_access {
            course.redact_video_urls();
        }
        Self { course, has_access }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseCatalogResponse {
    pub courses: Vec<CourseWithAccess>,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSort {
    #[default]
    Newest,
    Oldest,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CatalogParams {
    /// `newest` (default) or `oldest`
    #[serde(default)]
    #[param(value_type = Option<CatalogSort>)]
    pub sort: CatalogSort,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCourseDto {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "instructor_name is required"))]
    pub instructor_name: String,
    #[validate(length(min = 1, message = "image is required"))]
    pub image: String,
    #[serde(default)]
    pub privacy: Option<Privacy>,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    #[validate(nested)]
    pub videos: Vec<Video>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCourseDto {
    #[validate(length(min = 1, message = "title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "description cannot be empty"))]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "instructor_name cannot be empty"))]
    pub instructor_name: Option<String>,
    #[validate(length(min = 1, message = "image cannot be empty"))]
    pub image: Option<String>,
    pub privacy: Option<Privacy>,
    pub price: Option<Price>,
    #[validate(nested)]
    pub videos: Option<Vec<Video>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReplaceVideosDto {
    #[validate(nested)]
    pub videos: Vec<Video>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Case-insensitive substring matched against title and description
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct SearchResult {
    pub id: CourseId,
    pub title: String,
    pub image: String,
    /// Whether the caller may watch the course
    #[sqlx(skip)]
    pub has_access: bool,
    /// Always `course`
    #[serde(rename = "type")]
    #[sqlx(skip)]
    pub kind: SearchResultKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchResultKind {
    #[default]
    Course,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn video(title: &str, url: &str) -> Video {
        Video {
            title: title.to_string(),
            url: url.to_string(),
            bio: String::new(),
        }
    }

    fn course_with_videos(videos: Vec<Video>) -> Course {
        Course {
            id: CourseId::new(),
            title: "Rust".into(),
            description: "Ownership".into(),
            instructor_name: "Ferris".into(),
            image: "https://img.example/ferris.png".into(),
            privacy: Privacy::Public,
            price: Price::FREE,
            videos: Json(videos),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_paid_course_is_forced_private() {
        let paid = Price::from_amount(20.0).unwrap();
        assert_eq!(effective_privacy(Privacy::Public, paid), Privacy::Private);
        assert_eq!(effective_privacy(Privacy::Unlisted, paid), Privacy::Private);
        assert_eq!(
            effective_privacy(Privacy::Public, Price::FREE),
            Privacy::Public
        );
        assert_eq!(
            effective_privacy(Privacy::Unlisted, Price::FREE),
            Privacy::Unlisted
        );
    }

    #[test]
    fn test_privacy_defaults_private() {
        assert_eq!(Privacy::default(), Privacy::Private);
        let p: Privacy = serde_json::from_str(r#""unlisted""#).unwrap();
        assert_eq!(p, Privacy::Unlisted);
    }

    #[test]
    fn test_video_requires_title_and_absolute_url() {
        assert!(video("Intro", "https://cdn.example/intro.mp4").validate().is_ok());
        assert!(video("", "https://cdn.example/intro.mp4").validate().is_err());
        assert!(video("Intro", "intro.mp4").validate().is_err());
    }

    #[test]
    fn test_video_ignores_editing_flag() {
        let v: Video = serde_json::from_value(serde_json::json!({
            "title": "Intro",
            "url": "https://cdn.example/intro.mp4",
            "editing": true
        }))
        .unwrap();
        assert_eq!(v.bio, "");
        let out = serde_json::to_value(&v).unwrap();
        assert!(out.get("editing").is_none());
    }

    #[test]
    fn test_create_dto_validation() {
        let dto: CreateCourseDto = serde_json::from_value(serde_json::json!({
            "title": "",
            "description": "d",
            "instructor_name": "i",
            "image": "https://img.example/x.png",
            "videos": [{"title": "bad", "url": "nope"}]
        }))
        .unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
        assert!(errors.errors().contains_key("videos"));
    }

    #[test]
    fn test_redaction_without_access() {
        let course = course_with_videos(vec![video("Intro", "https://cdn.example/1.mp4")]);

        let visible = CourseWithAccess::new(course.clone(), true);
        assert_eq!(visible.course.videos.0[0].url, "https://cdn.example/1.mp4");

        let gated = CourseWithAccess::new(course, false);
        assert!(gated.course.videos.0[0].url.is_empty());
        assert_eq!(gated.course.videos.0[0].title, "Intro");

        let json = serde_json::to_value(&gated).unwrap();
        assert_eq!(json["has_access"], false);
        assert!(json["videos"][0].get("url").is_none());
        assert_eq!(json["title"], "Rust");
    }

    #[test]
    fn test_catalog_sort_parses() {
        let p: CatalogParams = serde_json::from_value(serde_json::json!({"sort": "oldest"})).unwrap();
        assert_eq!(p.sort, CatalogSort::Oldest);
        let p: CatalogParams = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(p.sort, CatalogSort::Newest);
    }

    #[test]
    fn test_search_result_serializes_type() {
        let r = SearchResult {
            id: CourseId::new(),
            title: "Rust".into(),
            image: "i".into(),
            has_access: false,
            kind: SearchResultKind::Course,
        };
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["type"], "course");
        assert_eq!(json["has_access"], false);
    }
}
