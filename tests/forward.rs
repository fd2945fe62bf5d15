//! `/api/admin/*` relay: path, query, body, headers, and error fidelity.

#![allow(clippy::panic)]

mod common;

use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use serde_json::json;

use common::{app, json_reply, request, send, spawn_backend};

#[tokio::test]
async fn get_relays_path_query_and_token() {
    let backend = spawn_backend(|_| json_reply(StatusCode::OK, json!({"items": [], "total": 0}))).await;

    let response = send(
        app(&backend.base_url),
        request(
            Method::GET,
            "/api/admin/users?page=2&limit=5&search=kim",
            Some("token=abc123"),
            None,
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({"items": [], "total": 0}));

    let seen = backend.single_request().await;
    assert_eq!(seen.method, Method::GET);
    assert_eq!(seen.target, "/v1/admin/users?page=2&limit=5&search=kim");
    assert_eq!(seen.authorization.as_deref(), Some("Bearer abc123"));
    assert_eq!(seen.accept.as_deref(), Some("application/json"));
    assert_eq!(seen.accept_language.as_deref(), Some("en"));
    assert_eq!(seen.content_type, None);
    assert!(seen.body.is_empty());
}

#[tokio::test]
async fn legacy_cookie_is_used_as_bearer() {
    let backend = spawn_backend(|_| json_reply(StatusCode::OK, json!({}))).await;
    send(
        app(&backend.base_url),
        request(Method::GET, "/api/admin/dashboard/overview", Some("access_token=old"), None),
    )
    .await;
    let seen = backend.single_request().await;
    assert_eq!(seen.authorization.as_deref(), Some("Bearer old"));
}

#[tokio::test]
async fn no_cookie_means_no_authorization_header() {
    let backend = spawn_backend(|_| json_reply(StatusCode::OK, json!({}))).await;
    send(
        app(&backend.base_url),
        request(Method::GET, "/api/admin/users", None, None),
    )
    .await;
    assert_eq!(backend.single_request().await.authorization, None);
}

#[tokio::test]
async fn post_forwards_json_body() {
    let backend = spawn_backend(|_| json_reply(StatusCode::OK, json!({"id": "w-1", "status": "REJECTED"}))).await;

    let response = send(
        app(&backend.base_url),
        request(
            Method::POST,
            "/api/admin/withdrawals/w-1/reject",
            Some("token=t"),
            Some(json!({"reason": "duplicate"})),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    let seen = backend.single_request().await;
    assert_eq!(seen.method, Method::POST);
    assert_eq!(seen.target, "/v1/admin/withdrawals/w-1/reject");
    assert_eq!(seen.content_type.as_deref(), Some("application/json"));
    assert_eq!(seen.json(), json!({"reason": "duplicate"}));
}

#[tokio::test]
async fn invalid_json_body_is_not_forwarded() {
    let backend = spawn_backend(|_| json_reply(StatusCode::OK, json!({}))).await;
    let Ok(req) = axum::http::Request::builder()
        .method(Method::PATCH)
        .uri("/api/admin/promos/p-1")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
    else {
        panic!("bad request");
    };

    send(app(&backend.base_url), req).await;

    let seen = backend.single_request().await;
    assert_eq!(seen.method, Method::PATCH);
    assert!(seen.body.is_empty());
    assert_eq!(seen.content_type, None);
}

#[tokio::test]
async fn path_segments_are_re_encoded() {
    let backend = spawn_backend(|_| json_reply(StatusCode::OK, json!({}))).await;
    send(
        app(&backend.base_url),
        request(Method::DELETE, "/api/admin/promos/a%20b", Some("token=t"), None),
    )
    .await;
    let seen = backend.single_request().await;
    assert_eq!(seen.method, Method::DELETE);
    assert_eq!(seen.target, "/v1/admin/promos/a%20b");
}

#[tokio::test]
async fn encoded_slash_stays_inside_its_segment() {
    let backend = spawn_backend(|_| json_reply(StatusCode::OK, json!({"id": "a/b"}))).await;
    let response = send(
        app(&backend.base_url),
        request(
            Method::PATCH,
            "/api/admin/users/a%2Fb/role",
            Some("token=t"),
            Some(json!({"role": "ADMIN"})),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    let seen = backend.single_request().await;
    assert_eq!(seen.method, Method::PATCH);
    assert_eq!(seen.target, "/v1/admin/users/a%2Fb/role");
}

#[tokio::test]
async fn empty_path_is_rejected_without_calling_backend() {
    let backend = spawn_backend(|_| json_reply(StatusCode::OK, json!({}))).await;
    let response = send(
        app(&backend.base_url),
        request(Method::GET, "/api/admin/", Some("token=t"), None),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["message"], "Admin path is required");
    assert!(backend.requests().await.is_empty());
}

#[tokio::test]
async fn backend_error_is_relayed_with_status() {
    let backend = spawn_backend(|_| {
        json_reply(
            StatusCode::CONFLICT,
            json!({"message": "Withdrawal already processed", "code": "WITHDRAWAL_STATE"}),
        )
    })
    .await;

    let response = send(
        app(&backend.base_url),
        request(Method::POST, "/api/admin/withdrawals/w-1/approve", Some("token=t"), None),
    )
    .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    let body = response.json();
    assert_eq!(body["message"], "Withdrawal already processed");
    assert_eq!(body["code"], "WITHDRAWAL_STATE");
    assert_eq!(body["details"]["code"], "WITHDRAWAL_STATE");
    assert!(response.set_cookies().is_empty());
}

#[tokio::test]
async fn plain_text_error_becomes_message() {
    let backend = spawn_backend(|_| (StatusCode::SERVICE_UNAVAILABLE, "maintenance window").into_response()).await;

    let response = send(
        app(&backend.base_url),
        request(Method::GET, "/api/admin/users", Some("token=t"), None),
    )
    .await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json()["message"], "maintenance window");
}

#[tokio::test]
async fn empty_success_body_is_null() {
    let backend = spawn_backend(|_| StatusCode::NO_CONTENT.into_response()).await;
    let response = send(
        app(&backend.base_url),
        request(Method::DELETE, "/api/admin/promos/p-1", Some("token=t"), None),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), serde_json::Value::Null);
}

#[tokio::test]
async fn unauthorized_clears_session_cookies() {
    let backend = spawn_backend(|_| json_reply(StatusCode::UNAUTHORIZED, json!({"message": "Unauthorized"}))).await;

    let response = send(
        app(&backend.base_url),
        request(Method::GET, "/api/admin/users", Some("token=expired"), None),
    )
    .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json()["message"], "Unauthorized");
    let Some(token) = response.cookie("token") else {
        panic!("session cookie was not cleared");
    };
    assert!(token.contains("Max-Age=0"));
    assert!(response.cookie("access_token").is_some());
}

#[tokio::test]
async fn unauthorized_keeps_cookies_when_disabled() {
    let backend = spawn_backend(|_| json_reply(StatusCode::UNAUTHORIZED, json!({"message": "Unauthorized"}))).await;
    let mut config = common::test_config(&backend.base_url);
    config.clear_cookie_on_unauthorized = false;

    let response = send(
        common::app_with(config),
        request(Method::GET, "/api/admin/users", Some("token=expired"), None),
    )
    .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.set_cookies().is_empty());
}

#[tokio::test]
async fn unreachable_backend_is_bad_gateway() {
    let response = send(
        app("http://127.0.0.1:1"),
        request(Method::GET, "/api/admin/users", Some("token=t"), None),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    let body = response.json();
    assert_eq!(body["message"], "Unable to connect to the backend service");
    assert_eq!(body["code"], "BACKEND_UNREACHABLE");
}
