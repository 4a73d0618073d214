use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    append_video, create_course, delete_course, get_admin_course, get_course, get_courses,
    list_admin_courses, replace_videos, update_course,
};

/// Public catalog and course viewer.
pub fn init_courses_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_courses))
        .route("/{id}", get(get_course))
}

/// Course back office, gated by the course-management check in each handler.
pub fn init_admin_courses_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_admin_courses).post(create_course))
        .route(
            "/{id}",
            get(get_admin_course)
                .patch(update_course)
                .delete(delete_course),
        )
        .route("/{id}/videos", axum::routing::post(append_video).put(replace_videos))
}
