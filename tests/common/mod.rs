//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use clinichub_api::{AppState, build_app};
use clinichub_auth::PasswordHasher;
use clinichub_core::config::AppConfig;
use clinichub_database::Stores;
use clinichub_database::memory::MemorySystemStore;
use clinichub_entity::user::{CreateUser, UserRole};
use clinichub_storage::LocalFileStore;

pub const PASSWORD: &str = "secret123";

/// Router over fresh in-memory stores and a private temp directory.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub system: Arc<MemorySystemStore>,
    pub files: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let files = tempfile::tempdir().expect("Failed to create temp dir");

        let mut config = AppConfig::default();
        config.auth.jwt_secret = "integration-test-secret-0123456789".to_string();
        config.auth.argon2_memory_kib = 8;
        config.auth.argon2_iterations = 1;
        config.auth.argon2_parallelism = 1;
        config.storage.upload_dir = files.path().join("uploads").display().to_string();
        config.storage.backup_dir = files.path().join("backups").display().to_string();

        let system = Arc::new(MemorySystemStore::default());
        let mut stores = Stores::in_memory();
        stores.system = system.clone();

        let uploads = LocalFileStore::new(&config.storage.upload_dir)
            .await
            .expect("Failed to open upload dir");
        let backups = LocalFileStore::new(&config.storage.backup_dir)
            .await
            .expect("Failed to open backup dir");

        let state = AppState::new(config, stores, Arc::new(uploads), Arc::new(backups))
            .expect("Failed to build app state");
        let router = build_app(state.clone());

        Self {
            router,
            state,
            system,
            files,
        }
    }

    /// Insert an active account directly into the user store.
    pub async fn create_user(&self, email: &str, role: UserRole) -> Uuid {
        let hasher = PasswordHasher::new(8, 1, 1).expect("Invalid test hasher params");
        let user = self
            .state
            .stores
            .users
            .create(&CreateUser {
                email: email.to_string(),
                name: format!("Test {role}"),
                password_hash: hasher.hash_password(PASSWORD).expect("Failed to hash"),
                role,
                is_active: true,
            })
            .await
            .expect("Failed to create test user");
        user.id
    }

    /// Log in through the API and return the token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(serde_json::json!({ "email": email, "password": password })),
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );
        response.body["token"]
            .as_str()
            .expect("No token in login response")
            .to_string()
    }

    /// Create a `{role}@clinic.test` account and log it in.
    pub async fn token_for(&self, role: UserRole) -> String {
        let email = format!("{role}@clinic.test");
        self.create_user(&email, role).await;
        self.login(&email, PASSWORD).await
    }

    /// Send a JSON request.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        self.send(req.body(Body::from(body)).expect("Failed to build request"))
            .await
    }

    /// Send a prebuilt request.
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    /// `error` field of an error envelope.
    pub fn error_kind(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }

    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }
}
