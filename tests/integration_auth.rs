mod common;

use axum::http::StatusCode;
use common::{
    TEST_PASSWORD, create_test_user, generate_unique_email, get_request, json_request, send,
    setup_test_app,
};
use coursehub::coursehub_core::Capability;
use coursehub::coursehub_core::errors::codes;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_signup_creates_plain_user(pool: PgPool) {
    let email = generate_unique_email().to_uppercase();

    let (status, body) = send(
        setup_test_app(pool.clone()),
        json_request(
            "POST",
            "/api/auth/signup",
            None,
            json!({ "name": "Ada Lovelace", "email": email, "password": "long-enough" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["email"], email.to_lowercase());
    assert_eq!(body["user"]["permissions"], json!(["user"]));
    assert_eq!(body["user"]["accessible_courses"], json!([]));
    assert!(body["user"].get("password").is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_signup_duplicate_email(pool: PgPool) {
    let existing = create_test_user(&pool, &[]).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        json_request(
            "POST",
            "/api/auth/signup",
            None,
            json!({ "name": "Again", "email": existing.email, "password": "long-enough" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], codes::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_success_and_me(pool: PgPool) {
    let user = create_test_user(&pool, &[Capability::ManageCourses]).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": user.email, "password": TEST_PASSWORD }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["user"]["permissions"], json!(["manage_courses"]));
    let token = body["token"].as_str().unwrap().to_string();

    let request = axum::http::Request::builder()
        .uri("/api/auth/me")
        .header("authorization", format!("Bearer {token}"))
        .body(axum::body::Body::empty())
        .unwrap();
    let (status, body) = send(setup_test_app(pool.clone()), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], user.id.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_failures_look_the_same(pool: PgPool) {
    let user = create_test_user(&pool, &[]).await;

    let attempts = [
        json!({ "email": user.email, "password": "wrong-password" }),
        json!({ "email": generate_unique_email(), "password": TEST_PASSWORD }),
    ];

    for attempt in attempts {
        let (status, body) = send(
            setup_test_app(pool.clone()),
            json_request("POST", "/api/auth/login", None, attempt),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid credentials");
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_token_for_deleted_user_is_rejected(pool: PgPool) {
    let user = create_test_user(&pool, &[]).await;

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();

    let (status, body) = send(
        setup_test_app(pool.clone()),
        get_request("/api/auth/me", Some(&user)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], codes::UNAUTHENTICATED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_permissions_come_from_store_not_token(pool: PgPool) {
    // Token minted with admin, store says plain user.
    let user = create_test_user(&pool, &[Capability::Admin]).await;
    sqlx::query("UPDATE users SET permissions = ARRAY['user'] WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();

    let (status, body) = send(
        setup_test_app(pool.clone()),
        get_request("/api/admin/courses", Some(&user)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], codes::INSUFFICIENT_PERMISSIONS);
}
