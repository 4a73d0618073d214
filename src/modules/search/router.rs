use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::search_courses;

pub fn init_search_router() -> Router<AppState> {
    Router::new().route("/", get(search_courses))
}
