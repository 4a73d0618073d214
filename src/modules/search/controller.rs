use axum::{
    Json,
    extract::{Query, State},
};
use tracing::instrument;

use coursehub_core::{AppError, ErrorResponse};
use coursehub_models::{SearchParams, SearchResponse};

use crate::middleware::auth::OptionalIdentity;
use crate::state::AppState;

use super::service::SearchService;

/// Search public courses by title or description
#[utoipa::path(
    get,
    path = "/api/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Up to 8 matching public courses", body = SearchResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security((), ("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, identity))]
pub async fn search_courses(
    State(state): State<AppState>,
    OptionalIdentity(identity): OptionalIdentity,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let results = SearchService::search(&state.db, &identity, &params.q).await?;
    Ok(Json(SearchResponse { results }))
}
