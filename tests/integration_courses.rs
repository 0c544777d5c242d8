mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{create_test_course, create_test_user, setup_test_app};
use http_body_util::BodyExt;
use learnhub::modules::users::model::UserRole;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

async fn send(
    app: axum::Router,
    method: &str,
    uri: &str,
    token: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token));
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_string(&value).unwrap())
        }
        None => Body::empty(),
    };
    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[sqlx::test(migrations = "./migrations")]
async fn course_crud_roundtrip(pool: PgPool) {
    let instructor = create_test_user(&pool, UserRole::Instructor).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/courses",
        &instructor.token,
        Some(json!({
            "title": "Rust for Beginners",
            "description": "An introduction to Rust",
            "category": "programming",
            "published": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["title"], "Rust for Beginners");
    assert_eq!(body["data"]["level"], "beginner");
    assert_eq!(body["data"]["instructor_id"], instructor.id.to_string());
    let course_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "PATCH",
        &format!("/api/courses/{course_id}"),
        &instructor.token,
        Some(json!({"title": "Rust, Properly"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Rust, Properly");

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "GET",
        &format!("/api/courses/{course_id}"),
        &instructor.token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Rust, Properly");
    assert_eq!(body["data"]["enrollment_count"], 0);
    assert_eq!(body["data"]["instructor"]["id"], instructor.id.to_string());

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "DELETE",
        &format!("/api/courses/{course_id}"),
        &instructor.token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "GET",
        &format!("/api/courses/{course_id}"),
        &instructor.token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "No course found with that ID");
}

#[sqlx::test(migrations = "./migrations")]
async fn student_cannot_create_course(pool: PgPool) {
    let student = create_test_user(&pool, UserRole::Student).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/courses",
        &student.token,
        Some(json!({
            "title": "Nope",
            "description": "Students cannot teach here",
            "category": "other"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["status"], "fail");
}

#[sqlx::test(migrations = "./migrations")]
async fn requests_without_token_are_unauthorized(pool: PgPool) {
    let request = Request::builder()
        .method("GET")
        .uri("/api/courses")
        .body(Body::empty())
        .unwrap();
    let response = setup_test_app(pool).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn unknown_course_field_is_rejected(pool: PgPool) {
    let instructor = create_test_user(&pool, UserRole::Instructor).await;
    let course_id = create_test_course(&pool, instructor.id, true).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "PATCH",
        &format!("/api/courses/{course_id}"),
        &instructor.token,
        Some(json!({"instructor_id": Uuid::new_v4()})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Unknown field: instructor_id");
}

#[sqlx::test(migrations = "./migrations")]
async fn student_listing_hides_unpublished_courses(pool: PgPool) {
    let instructor = create_test_user(&pool, UserRole::Instructor).await;
    let student = create_test_user(&pool, UserRole::Student).await;
    create_test_course(&pool, instructor.id, true).await;
    create_test_course(&pool, instructor.id, false).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "GET",
        "/api/courses",
        &student.token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["meta"]["total"], 1);

    // Asking for unpublished explicitly changes nothing for students.
    let (_, body) = send(
        setup_test_app(pool.clone()),
        "GET",
        "/api/courses?published=false",
        &student.token,
        None,
    )
    .await;
    assert_eq!(body["data"]["meta"]["total"], 1);

    let (_, body) = send(
        setup_test_app(pool.clone()),
        "GET",
        "/api/courses",
        &instructor.token,
        None,
    )
    .await;
    assert_eq!(body["data"]["meta"]["total"], 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn enrollment_flow(pool: PgPool) {
    let instructor = create_test_user(&pool, UserRole::Instructor).await;
    let student = create_test_user(&pool, UserRole::Student).await;
    let course_id = create_test_course(&pool, instructor.id, true).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        &format!("/api/courses/{course_id}/enroll"),
        &student.token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Successfully enrolled in course");
    assert_eq!(body["data"]["progress"], 0.0);
    assert_eq!(body["data"]["completed"], false);

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        &format!("/api/courses/{course_id}/enroll"),
        &student.token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "You are already enrolled in this course");

    let (_, body) = send(
        setup_test_app(pool.clone()),
        "GET",
        &format!("/api/courses/{course_id}"),
        &instructor.token,
        None,
    )
    .await;
    assert_eq!(body["data"]["enrollment_count"], 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn enrollment_gated_to_published_courses(pool: PgPool) {
    let instructor = create_test_user(&pool, UserRole::Instructor).await;
    let student = create_test_user(&pool, UserRole::Student).await;
    let course_id = create_test_course(&pool, instructor.id, false).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        &format!("/api/courses/{course_id}/enroll"),
        &student.token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "This course is not published yet");
}
