//! Bearer token and role checks in front of protected routes.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use clinichub_entity::user::UserRole;
use common::TestApp;

#[tokio::test]
async fn test_missing_token() {
    let app = TestApp::new().await;
    let response = app.request("GET", "/api/patients", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.message(), "Token missing");
    assert_eq!(response.error_kind(), "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_malformed_header() {
    let app = TestApp::new().await;
    let request = Request::builder()
        .uri("/api/patients")
        .header("Authorization", "Bearer")
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.message(), "Invalid token format");
}

#[tokio::test]
async fn test_garbage_token() {
    let app = TestApp::new().await;
    let response = app
        .request("GET", "/api/patients", None, Some("not-a-jwt"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.message(), "Invalid token");
}

#[tokio::test]
async fn test_admin_routes_reject_other_roles() {
    let app = TestApp::new().await;
    let nurse = app.token_for(UserRole::Nurse).await;

    let response = app
        .request("GET", "/api/admin/users", None, Some(&nurse))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.message(), "admin access only");

    let response = app
        .request("GET", "/api/analytics/revenue", None, Some(&nurse))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_role_requirement_met() {
    let app = TestApp::new().await;
    let admin = app.token_for(UserRole::Admin).await;

    let response = app
        .request("GET", "/api/admin/users", None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["users"].as_array().unwrap().len(), 1);
    assert!(response.body["users"][0].get("password_hash").is_none());
    assert!(response.body["users"][0].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = TestApp::new().await;
    let response = app.request("GET", "/api/nothing-here", None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.message(), "Resource not found");
}
