//! Registration, login and session profile.

mod common;

use axum::http::StatusCode;
use clinichub_entity::user::UserRole;
use common::{PASSWORD, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_register_then_login() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "name": "Nora Nurse",
                "email": "Nora@Clinic.test",
                "password": "secret123",
                "role": "nurse"
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["user"]["email"], "nora@clinic.test");
    assert_eq!(response.body["user"]["role"], "nurse");
    assert!(response.body["token"].as_str().is_some());

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "nora@clinic.test", "password": "secret123" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["user"]["role"], "nurse");
}

#[tokio::test]
async fn test_register_defaults_to_staff_and_rejects_duplicates() {
    let app = TestApp::new().await;
    let body = json!({ "name": "Sam", "email": "sam@clinic.test", "password": "secret123" });

    let first = app
        .request("POST", "/api/auth/register", Some(body.clone()), None)
        .await;
    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(first.body["user"]["role"], "staff");

    let second = app
        .request("POST", "/api/auth/register", Some(body), None)
        .await;
    assert_eq!(second.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::new().await;

    let missing = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "email": "x@clinic.test", "password": "secret123" })),
            None,
        )
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        missing.message(),
        "Missing required fields: name, email, or password"
    );

    let bad_role = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "name": "X",
                "email": "x@clinic.test",
                "password": "secret123",
                "role": "janitor"
            })),
            None,
        )
        .await;
    assert_eq!(bad_role.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bad_credentials_are_indistinguishable() {
    let app = TestApp::new().await;
    app.create_user("doc@clinic.test", UserRole::Doctor).await;

    let wrong_password = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "doc@clinic.test", "password": "nope-nope" })),
            None,
        )
        .await;
    let unknown_email = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "ghost@clinic.test", "password": PASSWORD })),
            None,
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_email.body);
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let app = TestApp::new().await;
    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "doc@clinic.test" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Email and password are required");
}

#[tokio::test]
async fn test_staff_login_and_me() {
    let app = TestApp::new().await;
    app.create_user("rx@clinic.test", UserRole::Pharmacist).await;

    let response = app
        .request(
            "POST",
            "/api/staff/auth/login",
            Some(json!({ "email": "rx@clinic.test", "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let token = response.body["token"].as_str().unwrap().to_string();

    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["user"]["email"], "rx@clinic.test");
    assert_eq!(me.body["user"]["role"], "pharmacist");
}
