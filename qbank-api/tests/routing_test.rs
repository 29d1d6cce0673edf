/// Router tests that never reach the database
///
/// Guards, cookies, headers and upload validation all run before any query,
/// so these use an app whose pool never connects.

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{body_json, lazy_app, multipart_body, session_cookie_for, set_cookie, upload_request};
use qbank_shared::models::account::Role;
use tower::ServiceExt;
use uuid::Uuid;

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn student_cookie() -> String {
    session_cookie_for(Uuid::new_v4(), "ann@example.com", Role::Student)
}

fn admin_cookie() -> String {
    session_cookie_for(Uuid::new_v4(), "boss@example.com", Role::Admin)
}

#[tokio::test]
async fn test_index_without_session_points_to_login() {
    let response = lazy_app().oneshot(get("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["authenticated"], false);
    assert_eq!(body["redirect"], "/login");
}

#[tokio::test]
async fn test_index_with_session_points_to_dashboard() {
    let cookie = student_cookie();
    let response = lazy_app().oneshot(get("/", Some(&cookie))).await.unwrap();

    let body = body_json(response).await;
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["redirect"], "/dashboard");
}

#[tokio::test]
async fn test_protected_routes_require_session() {
    for uri in ["/dashboard", "/question-bank", "/api/submissions", "/admin/dashboard"] {
        let response = lazy_app().oneshot(get(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn test_tampered_session_rejected() {
    let cookie = format!("{}x", student_cookie());
    let response = lazy_app()
        .oneshot(get("/dashboard", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn test_dashboard_reads_identity_from_session() {
    let cookie = student_cookie();
    let response = lazy_app()
        .oneshot(get("/dashboard", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["username"], "ann");
    assert_eq!(body["role"], "student");
}

#[tokio::test]
async fn test_student_cannot_reach_admin_routes() {
    let cookie = student_cookie();

    let response = lazy_app()
        .oneshot(get("/admin/dashboard", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let upload = upload_request(&cookie, multipart_body("file", "users.csv", b"email\n"));
    let response = lazy_app().oneshot(upload).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_bulk_update_without_file() {
    let body = multipart_body("notes", "notes.txt", b"hello");
    let response = lazy_app()
        .oneshot(upload_request(&admin_cookie(), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "No file uploaded");
}

#[tokio::test]
async fn test_bulk_update_with_empty_file_selection() {
    let body = multipart_body("file", "", b"");
    let response = lazy_app()
        .oneshot(upload_request(&admin_cookie(), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "No file uploaded");
}

#[tokio::test]
async fn test_bulk_update_rejects_non_utf8_upload() {
    let body = multipart_body("file", "users.csv", &[0xff, 0xfe, 0x00, 0x65]);
    let response = lazy_app()
        .oneshot(upload_request(&admin_cookie(), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("Failed to read file:"), "{message}");
}

#[tokio::test]
async fn test_bulk_update_rejects_empty_upload() {
    let body = multipart_body("file", "users.csv", b"");
    let response = lazy_app()
        .oneshot(upload_request(&admin_cookie(), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Failed to read file: upload has no header row");
}

#[tokio::test]
async fn test_login_with_existing_session_returns_it() {
    let user_id = Uuid::new_v4();
    let cookie = session_cookie_for(user_id, "ann@example.com", Role::Student);

    let request = Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::COOKIE, cookie)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("username=someone&password=else"))
        .unwrap();
    let response = lazy_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response).is_none());
    let body = body_json(response).await;
    assert_eq!(body["user_id"], user_id.to_string());
    assert_eq!(body["email"], "ann@example.com");
}

#[tokio::test]
async fn test_login_with_blank_credentials_is_unauthorized() {
    let request = Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"username": "", "password": ""}"#))
        .unwrap();
    let response = lazy_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let response = lazy_app().oneshot(get("/logout", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = set_cookie(&response).unwrap();
    assert!(cookie.starts_with("qbank_session=;"));
    assert!(cookie.contains("Max-Age=0"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Expires="));
}

#[tokio::test]
async fn test_logout_with_session_emits_single_removal() {
    let request = Request::builder()
        .method("POST")
        .uri("/logout")
        .header(header::COOKIE, student_cookie())
        .body(Body::empty())
        .unwrap();
    let response = lazy_app().oneshot(request).await.unwrap();

    let removals: Vec<_> = response.headers().get_all(header::SET_COOKIE).iter().collect();
    assert_eq!(removals.len(), 1);
    assert!(removals[0].to_str().unwrap().starts_with("qbank_session=;"));
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let response = lazy_app().oneshot(get("/nowhere", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_every_response_is_uncacheable() {
    for uri in ["/", "/dashboard", "/nowhere"] {
        let response = lazy_app().oneshot(get(uri, None)).await.unwrap();
        let headers = response.headers();

        assert_eq!(
            headers.get(header::CACHE_CONTROL).unwrap(),
            "no-store, no-cache, must-revalidate, max-age=0",
            "{uri}"
        );
        assert_eq!(headers.get(header::PRAGMA).unwrap(), "no-cache", "{uri}");
        assert_eq!(headers.get(header::EXPIRES).unwrap(), "0", "{uri}");
    }
}
