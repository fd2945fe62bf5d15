//! Route guard and console bundle serving through the full router.

#![allow(clippy::panic)]

mod common;

use axum::http::{Method, StatusCode};

use common::{app, request, send};

const BACKEND: &str = "http://127.0.0.1:1";

#[tokio::test]
async fn anonymous_page_redirects_to_login_keeping_query() {
    let response = send(app(BACKEND), request(Method::GET, "/dashboard/users?page=2", None, None)).await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.location().as_deref(), Some("/en/admin/login?page=2"));
}

#[tokio::test]
async fn signed_in_login_redirects_to_dashboard() {
    let response = send(
        app(BACKEND),
        request(Method::GET, "/fr/admin/login", Some("token=jwt"), None),
    )
    .await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.location().as_deref(), Some("/fr/dashboard"));
}

#[tokio::test]
async fn legacy_cookie_counts_as_signed_in() {
    let response = send(
        app(BACKEND),
        request(Method::GET, "/en/login", Some("access_token=old"), None),
    )
    .await;
    assert_eq!(response.location().as_deref(), Some("/en/dashboard"));
}

#[tokio::test]
async fn signed_in_page_without_locale_is_rebased() {
    let response = send(
        app(BACKEND),
        request(Method::GET, "/promotions?status=active", Some("token=jwt"), None),
    )
    .await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.location().as_deref(), Some("/en/promotions?status=active"));
}

#[tokio::test]
async fn allowed_page_serves_console_shell() {
    let response = send(
        app(BACKEND),
        request(Method::GET, "/en/dashboard", Some("token=jwt"), None),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(String::from_utf8_lossy(&response.body).contains("Admin Console"));
}

#[tokio::test]
async fn login_page_is_served_without_cookie() {
    let response = send(app(BACKEND), request(Method::GET, "/en/admin/login", None, None)).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn static_assets_bypass_the_guard() {
    let response = send(app(BACKEND), request(Method::GET, "/app.js", None, None)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(String::from_utf8_lossy(&response.body).contains("admin console"));
}

#[tokio::test]
async fn health_bypasses_the_guard() {
    let response = send(app(BACKEND), request(Method::GET, "/health", None, None)).await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn api_calls_are_not_redirected() {
    let response = send(app(BACKEND), request(Method::GET, "/api/auth/me", None, None)).await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.location(), None);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let response = send(app(BACKEND), request(Method::GET, "/api-docs/openapi.json", None, None)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.json()["paths"].get("/api/console/users").is_some());
}
