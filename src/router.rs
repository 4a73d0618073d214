use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware};
use coursehub_observability::{logging_middleware, metrics_middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::modules::auth::init_auth_router;
use crate::modules::courses::{init_admin_courses_router, init_courses_router};
use crate::modules::media::init_media_router;
use crate::modules::search::init_search_router;
use crate::modules::users::init_users_router;
use crate::state::AppState;

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .nest("/auth", init_auth_router())
                .nest("/courses", init_courses_router())
                .nest("/search", init_search_router())
                .nest("/admin/courses", init_admin_courses_router())
                .nest("/users", init_users_router())
                .nest("/media", init_media_router(&state.media_config)),
        )
        .with_state(state.clone())
        .layer(cors_layer(&state))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::RANGE,
        ])
        .expose_headers([header::CONTENT_RANGE, header::ACCEPT_RANGES])
        .allow_credentials(true)
}
