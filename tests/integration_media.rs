mod common;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use common::{TestUser, create_test_user, json_request, send, setup_test_app};
use coursehub::coursehub_core::Capability;
use coursehub::coursehub_core::errors::codes;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;

const BOUNDARY: &str = "coursehub-test-boundary";

fn multipart_upload(
    uri: &str,
    user: &TestUser,
    filename: &str,
    content_type: &str,
    data: &[u8],
    course_id: Option<&str>,
) -> Request<Body> {
    let mut body = Vec::new();
    if let Some(course_id) = course_id {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"course_id\"\r\n\r\n{course_id}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::AUTHORIZATION, user.bearer())
        .body(Body::from(body))
        .unwrap()
}

/// Like `send`, but keeps headers and the raw body.
async fn fetch(app: Router, uri: &str, range: Option<&str>) -> (StatusCode, HeaderMap, Bytes) {
    let mut builder = Request::builder().uri(uri);
    if let Some(range) = range {
        builder = builder.header(header::RANGE, range);
    }
    let response = app
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, body)
}

async fn upload(pool: &PgPool, request: Request<Body>) -> (StatusCode, Value) {
    send(setup_test_app(pool.clone()), request).await
}

#[sqlx::test(migrations = "./migrations")]
async fn test_image_upload_and_fetch(pool: PgPool) {
    let manager = create_test_user(&pool, &[Capability::ManageCourses]).await;
    let png = b"\x89PNG\r\n\x1a\nfake-image";

    let (status, body) = upload(
        &pool,
        multipart_upload("/api/media/images", &manager, "my thumb.png", "image/png", png, None),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert!(body["filename"].as_str().unwrap().ends_with("-my_thumb.png"));
    let id = body["id"].as_str().unwrap().to_string();
    assert_eq!(
        body["url"],
        format!("http://media.test/api/media/images/{id}")
    );

    let (status, headers, bytes) =
        fetch(setup_test_app(pool.clone()), &format!("/api/media/images/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "image/png");
    assert_eq!(
        headers[header::CACHE_CONTROL],
        "public, max-age=31536000, immutable"
    );
    assert_eq!(bytes.as_ref(), png.as_slice());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_upload_rejections(pool: PgPool) {
    let manager = create_test_user(&pool, &[Capability::ManageCourses]).await;
    let plain = create_test_user(&pool, &[]).await;

    let (status, body) = upload(
        &pool,
        multipart_upload("/api/media/images", &manager, "notes.txt", "text/plain", b"hi", None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], codes::BAD_REQUEST);

    let (status, body) = upload(
        &pool,
        multipart_upload("/api/media/images", &manager, "big.png", "image/png", &[0u8; 2048], None),
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["code"], codes::PAYLOAD_TOO_LARGE);

    let (status, _) = upload(
        &pool,
        multipart_upload("/api/media/images", &manager, "empty.png", "image/png", b"", None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = upload(
        &pool,
        multipart_upload("/api/media/videos", &plain, "clip.mp4", "video/mp4", b"0123", None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], codes::INSUFFICIENT_PERMISSIONS);

    let (status, _) = upload(
        &pool,
        multipart_upload(
            "/api/media/videos",
            &manager,
            "clip.mp4",
            "video/mp4",
            b"0123",
            Some("00000000-0000-0000-0000-000000000abc"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_video_range_requests(pool: PgPool) {
    let manager = create_test_user(&pool, &[Capability::ManageCourses]).await;

    let (status, body) = upload(
        &pool,
        multipart_upload("/api/media/videos", &manager, "clip.mp4", "video/mp4", b"0123456789", None),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let filename = body["filename"].as_str().unwrap().to_string();
    assert_eq!(
        body["url"],
        format!("http://media.test/api/media/videos/{filename}")
    );
    let uri = format!("/api/media/videos/{filename}");

    let (status, headers, bytes) = fetch(setup_test_app(pool.clone()), &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::ACCEPT_RANGES], "bytes");
    assert_eq!(bytes.as_ref(), b"0123456789".as_slice());

    let (status, headers, bytes) =
        fetch(setup_test_app(pool.clone()), &uri, Some("bytes=2-5")).await;
    assert_eq!(status, StatusCode::PARTIAL_CONTENT);
    assert_eq!(headers[header::CONTENT_RANGE], "bytes 2-5/10");
    assert_eq!(headers[header::CONTENT_LENGTH], "4");
    assert_eq!(bytes.as_ref(), b"2345".as_slice());

    let (status, headers, bytes) =
        fetch(setup_test_app(pool.clone()), &uri, Some("bytes=7-")).await;
    assert_eq!(status, StatusCode::PARTIAL_CONTENT);
    assert_eq!(headers[header::CONTENT_RANGE], "bytes 7-9/10");
    assert_eq!(bytes.as_ref(), b"789".as_slice());

    let (status, headers, _) =
        fetch(setup_test_app(pool.clone()), &uri, Some("bytes=20-30")).await;
    assert_eq!(status, StatusCode::RANGE_NOT_SATISFIABLE);
    assert_eq!(headers[header::CONTENT_RANGE], "bytes */10");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_course_deletion_removes_linked_videos(pool: PgPool) {
    let manager = create_test_user(&pool, &[Capability::ManageCourses]).await;

    let (_, linked) = upload(
        &pool,
        multipart_upload("/api/media/videos", &manager, "lesson.mp4", "video/mp4", b"lesson", None),
    )
    .await;
    let (_, unrelated) = upload(
        &pool,
        multipart_upload("/api/media/videos", &manager, "other.mp4", "video/mp4", b"other", None),
    )
    .await;

    let (status, course) = send(
        setup_test_app(pool.clone()),
        json_request(
            "POST",
            "/api/admin/courses",
            Some(&manager),
            json!({
                "title": "Streaming",
                "description": "Bytes in order",
                "instructor_name": "Ferris",
                "image": "https://img.test/s.png",
                "videos": [{ "title": "Lesson", "url": linked["url"] }]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{course}");

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/admin/courses/{}", course["id"].as_str().unwrap()))
        .header(header::AUTHORIZATION, manager.bearer())
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(setup_test_app(pool.clone()), request).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let linked_uri = format!("/api/media/videos/{}", linked["filename"].as_str().unwrap());
    let (status, _, _) = fetch(setup_test_app(pool.clone()), &linked_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let unrelated_uri = format!("/api/media/videos/{}", unrelated["id"].as_str().unwrap());
    let (status, _, _) = fetch(setup_test_app(pool.clone()), &unrelated_uri, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_video(pool: PgPool) {
    let manager = create_test_user(&pool, &[Capability::ManageCourses]).await;
    let (_, body) = upload(
        &pool,
        multipart_upload("/api/media/videos", &manager, "gone.mp4", "video/mp4", b"bye", None),
    )
    .await;
    let uri = format!("/api/media/videos/{}", body["id"].as_str().unwrap());

    let delete = || {
        Request::builder()
            .method("DELETE")
            .uri(&uri)
            .header(header::AUTHORIZATION, manager.bearer())
            .body(Body::empty())
            .unwrap()
    };

    let (status, _) = send(setup_test_app(pool.clone()), delete()).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(setup_test_app(pool.clone()), delete()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
