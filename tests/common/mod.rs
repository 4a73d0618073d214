#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use coursehub::coursehub_auth::create_access_token;
use coursehub::coursehub_config::{CorsConfig, JwtConfig, MediaConfig};
use coursehub::coursehub_core::{Capability, hash_password};
use coursehub::coursehub_models::{CourseId, Email, UserId};
use coursehub::router::init_router;
use coursehub::state::AppState;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "testpass123";

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig::new("test-secret-key-at-least-32-characters-long", 3600)
}

pub fn test_media_config() -> MediaConfig {
    MediaConfig {
        public_base_url: "http://media.test".to_string(),
        max_image_bytes: 1024,
        max_video_bytes: 4096,
    }
}

pub fn setup_test_app(pool: PgPool) -> Router {
    let state = AppState::new(
        pool,
        test_jwt_config(),
        CorsConfig {
            allowed_origins: vec!["http://localhost:5173".to_string()],
        },
        test_media_config(),
    );
    init_router(state)
}

pub struct TestUser {
    pub id: UserId,
    pub email: String,
    pub token: String,
}

impl TestUser {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

/// Inserts a user directly and mints a token for it.
pub async fn create_test_user(pool: &PgPool, capabilities: &[Capability]) -> TestUser {
    let email = generate_unique_email();
    let hashed = hash_password(TEST_PASSWORD).unwrap();
    let tags = Capability::to_tags(&Capability::normalize(capabilities.iter().copied()));

    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO users (name, email, password, permissions) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind("Test User")
    .bind(&email)
    .bind(&hashed)
    .bind(&tags)
    .fetch_one(pool)
    .await
    .unwrap();

    let id = UserId::from_uuid(id);
    let token = create_access_token(
        id,
        &Email::new(&email).unwrap(),
        capabilities,
        &test_jwt_config(),
    )
    .unwrap();

    TestUser { id, email, token }
}

pub async fn create_test_course(
    pool: &PgPool,
    title: &str,
    privacy: &str,
    price_cents: i64,
) -> CourseId {
    let videos = json!([{
        "title": "Lesson 1",
        "url": format!("https://cdn.test/{}.mp4", Uuid::new_v4()),
        "bio": ""
    }]);

    let id: Uuid = sqlx::query_scalar(
        r#"INSERT INTO courses (title, description, instructor_name, image, privacy, price_cents, videos)
           VALUES ($1, $2, 'Ferris', 'https://img.test/thumb.png', $3::course_privacy, $4, $5)
           RETURNING id"#,
    )
    .bind(title)
    .bind(format!("{title} description"))
    .bind(privacy)
    .bind(price_cents)
    .bind(videos)
    .fetch_one(pool)
    .await
    .unwrap();

    CourseId::from_uuid(id)
}

/// Grants courses by going through the admin endpoint, the only write path.
pub async fn grant_courses(pool: &PgPool, admin: &TestUser, user: &TestUser, courses: &[CourseId]) {
    let ids: Vec<String> = courses.iter().map(|c| c.to_string()).collect();
    let (status, body) = send(
        setup_test_app(pool.clone()),
        json_request(
            "PATCH",
            &format!("/api/users/{}", user.id),
            Some(admin),
            json!({ "accessible_courses": ids }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
}

pub fn json_request(method: &str, uri: &str, user: Option<&TestUser>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(user) = user {
        builder = builder.header(header::AUTHORIZATION, user.bearer());
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, user: Option<&TestUser>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(user) = user {
        builder = builder.header(header::AUTHORIZATION, user.bearer());
    }
    builder.body(Body::empty()).unwrap()
}

/// Sends one request and decodes a JSON body (`Value::Null` when empty).
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
