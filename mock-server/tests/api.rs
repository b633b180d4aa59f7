use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with, Course, ServerConfig, DEFAULT_TOKEN};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str, token: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
        .header(http::header::HOST, "canvas.test")
        .body(String::new())
        .unwrap()
}

fn form_request(method: &str, uri: &str, token: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(body.to_string())
        .unwrap()
}

fn seeded(count: u64, page_size: usize) -> axum::Router {
    let seed = (1..=count)
        .map(|id| Course::available(id, &format!("Course {id}"), &format!("C-{id}")))
        .collect();
    app_with(
        ServerConfig {
            page_size,
            read_only_token: Some("reader".to_string()),
            ..ServerConfig::default()
        },
        seed,
    )
}

// --- auth ---

#[tokio::test]
async fn missing_token_gets_challenge() {
    let resp = app()
        .oneshot(Request::builder().uri("/api/v1/courses").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(http::header::WWW_AUTHENTICATE));
}

#[tokio::test]
async fn read_only_token_cannot_write() {
    let resp = seeded(1, 10)
        .oneshot(form_request("DELETE", "/api/v1/courses/1", "reader", "event=delete"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(!resp.headers().contains_key(http::header::WWW_AUTHENTICATE));
}

// --- list ---

#[tokio::test]
async fn list_courses_empty() {
    let resp = app().oneshot(get("/api/v1/courses", DEFAULT_TOKEN)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!resp.headers().contains_key(http::header::LINK));
    let courses: Vec<Course> = body_json(resp).await;
    assert!(courses.is_empty());
}

#[tokio::test]
async fn list_courses_pages_with_link_header() {
    let resp = seeded(5, 2)
        .oneshot(get("/api/v1/courses?state%5B%5D=AVAILABLE", DEFAULT_TOKEN))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let link = resp.headers()[http::header::LINK].to_str().unwrap().to_string();
    assert!(link.contains("<http://canvas.test/api/v1/courses?state%5B%5D=AVAILABLE&page=2&per_page=2>; rel=\"next\""));
    let courses: Vec<Course> = body_json(resp).await;
    let ids: Vec<u64> = courses.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn list_courses_last_page_has_no_next() {
    let resp = seeded(5, 2)
        .oneshot(get("/api/v1/courses?page=3&per_page=2", DEFAULT_TOKEN))
        .await
        .unwrap();

    assert!(!resp.headers().contains_key(http::header::LINK));
    let courses: Vec<Course> = body_json(resp).await;
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].id, 5);
}

#[tokio::test]
async fn list_courses_huge_page_is_empty() {
    let resp = seeded(3, 2)
        .oneshot(get(
            "/api/v1/courses?page=18446744073709551615&per_page=18446744073709551615",
            DEFAULT_TOKEN,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!resp.headers().contains_key(http::header::LINK));
    let courses: Vec<Course> = body_json(resp).await;
    assert!(courses.is_empty());
}

#[tokio::test]
async fn list_courses_filters_by_state() {
    let resp = seeded(3, 10)
        .oneshot(get("/api/v1/courses?state%5B%5D=UNPUBLISHED", DEFAULT_TOKEN))
        .await
        .unwrap();

    let courses: Vec<Course> = body_json(resp).await;
    assert!(courses.is_empty());
}

// --- get ---

#[tokio::test]
async fn get_course_found() {
    let resp = seeded(2, 10).oneshot(get("/api/v1/courses/2", DEFAULT_TOKEN)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let course: Course = body_json(resp).await;
    assert_eq!(course.name, "Course 2");
}

#[tokio::test]
async fn get_course_not_found() {
    let resp = app().oneshot(get("/api/v1/courses/99", DEFAULT_TOKEN)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_course_non_numeric_id_is_not_found() {
    let resp = app().oneshot(get("/api/v1/courses/sis_course_id:X", DEFAULT_TOKEN)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- create ---

#[tokio::test]
async fn create_course_returns_200() {
    let resp = app()
        .oneshot(form_request(
            "POST",
            "/api/v1/accounts/1/courses",
            DEFAULT_TOKEN,
            "course%5Bcourse_code%5D=RUST-101&course%5Bname%5D=Intro+to+Rust",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let course: Course = body_json(resp).await;
    assert_eq!(course.id, 1);
    assert_eq!(course.name, "Intro to Rust");
    assert_eq!(course.course_code, "RUST-101");
    assert_eq!(course.workflow_state, "unpublished");
}

#[tokio::test]
async fn create_course_unknown_account_returns_404() {
    let resp = app()
        .oneshot(form_request("POST", "/api/v1/accounts/42/courses", DEFAULT_TOKEN, "course%5Bname%5D=X"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_course_without_form_content_type_is_rejected() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/accounts/1/courses")
                .header(http::header::AUTHORIZATION, format!("Bearer {DEFAULT_TOKEN}"))
                .body("course%5Bname%5D=X".to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

// --- delete ---

#[tokio::test]
async fn delete_course_returns_delete_flag() {
    let resp = seeded(1, 10)
        .oneshot(form_request("DELETE", "/api/v1/courses/1", DEFAULT_TOKEN, "event=delete"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body, serde_json::json!({"delete": true}));
}

#[tokio::test]
async fn conclude_course_returns_conclude_flag() {
    let resp = seeded(1, 10)
        .oneshot(form_request("DELETE", "/api/v1/courses/1", DEFAULT_TOKEN, "event=conclude"))
        .await
        .unwrap();

    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body, serde_json::json!({"conclude": true}));
}

#[tokio::test]
async fn delete_course_unknown_event_returns_400() {
    let resp = seeded(1, 10)
        .oneshot(form_request("DELETE", "/api/v1/courses/1", DEFAULT_TOKEN, "event=archive"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = body_bytes(resp).await;
    assert!(std::str::from_utf8(&bytes).unwrap().contains("conclude"));
}

#[tokio::test]
async fn delete_course_not_found() {
    let resp = app()
        .oneshot(form_request("DELETE", "/api/v1/courses/5", DEFAULT_TOKEN, "event=delete"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
