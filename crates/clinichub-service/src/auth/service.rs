//! Account registration and credential login.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use clinichub_auth::{ClaimSubject, PasswordHasher, PasswordValidator, SessionTokenCodec};
use clinichub_core::{AppError, AppResult};
use clinichub_database::UserStore;
use clinichub_entity::audit::{AuditAction, AuditActor};
use clinichub_entity::user::model::normalize_email;
use clinichub_entity::user::{CreateUser, User, UserRole};

use crate::audit::AuditRecorder;
use crate::context::{RequestContext, RequestOrigin};
use crate::validation;

/// Body of `POST /api/auth/register`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Defaults to `staff`.
    pub role: Option<String>,
}

/// Body of the login routes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Token plus profile returned by register and login.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserSummary,
    pub message: String,
}

/// Which login route was used; only the success message differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginPortal {
    Clinic,
    Staff,
}

impl LoginPortal {
    fn success_message(&self) -> &'static str {
        match self {
            Self::Clinic => "Login successful!",
            Self::Staff => "Staff login successful!",
        }
    }
}

/// Issues sessions for staff accounts.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
    codec: Arc<SessionTokenCodec>,
    recorder: AuditRecorder,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService").finish_non_exhaustive()
    }
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        codec: Arc<SessionTokenCodec>,
        recorder: AuditRecorder,
    ) -> Self {
        Self {
            users,
            hasher,
            validator,
            codec,
            recorder,
        }
    }

    /// Create an account and log it in.
    pub async fn register(
        &self,
        origin: &RequestOrigin,
        req: RegisterRequest,
    ) -> AppResult<AuthResponse> {
        let email = normalize_email(req.email.as_deref().unwrap_or_default());
        let name = req.name.as_deref().unwrap_or_default().trim().to_string();
        let password = req.password.unwrap_or_default();

        if email.is_empty() || password.is_empty() || name.is_empty() {
            return Err(AppError::invalid_input(
                "Missing required fields: name, email, or password",
            ));
        }
        self.validator.validate(&password)?;
        validation::require_email(&email)?;

        let role = match validation::non_blank(req.role) {
            Some(raw) => raw.parse::<UserRole>()?,
            None => UserRole::default(),
        };

        let password_hash = hash_blocking(&self.hasher, password).await?;
        let user = self
            .users
            .create(&CreateUser {
                email,
                name,
                password_hash,
                role,
                is_active: true,
            })
            .await?;

        info!(user_id = %user.id, role = %user.role, "User registered");
        self.recorder
            .record(
                origin,
                AuditAction::UserRegistered,
                AuditActor::User(user.id),
                json!({ "email": user.email, "role": user.role }),
            )
            .await;

        self.session_for(&user, "User registered successfully")
    }

    /// Exchange credentials for a session token.
    pub async fn login(
        &self,
        origin: &RequestOrigin,
        portal: LoginPortal,
        req: LoginRequest,
    ) -> AppResult<AuthResponse> {
        let (Some(email), Some(password)) = (
            validation::non_blank(req.email),
            req.password.filter(|p| !p.is_empty()),
        ) else {
            return Err(AppError::invalid_input("Email and password are required"));
        };
        let email = normalize_email(&email);

        let user = match self.users.find_by_email(&email).await? {
            Some(user) if user.can_login() => {
                let hash = user.password_hash.clone();
                if verify_blocking(&self.hasher, password, hash).await? {
                    Some(user)
                } else {
                    None
                }
            }
            _ => None,
        };

        let Some(user) = user else {
            self.recorder
                .record(
                    origin,
                    AuditAction::LoginFailed,
                    AuditActor::Public,
                    json!({ "email": email }),
                )
                .await;
            return Err(AppError::unauthenticated("Invalid credentials"));
        };

        self.users.touch_last_login(user.id, Utc::now()).await?;
        info!(user_id = %user.id, "User logged in");

        self.session_for(&user, portal.success_message())
    }

    /// Profile of the caller, straight from the verified claims.
    pub fn me(&self, ctx: &RequestContext) -> UserSummary {
        UserSummary {
            id: ctx.user_id,
            name: ctx.name.clone(),
            email: ctx.email.clone(),
            role: ctx.role,
        }
    }

    fn session_for(&self, user: &User, message: &str) -> AppResult<AuthResponse> {
        let issued = self
            .codec
            .issue(&ClaimSubject::from(user))
            .map_err(|e| AppError::internal(format!("Failed to issue session token: {e}")))?;

        Ok(AuthResponse {
            token: issued.token,
            user: UserSummary::from(user),
            message: message.to_string(),
        })
    }
}

/// Run Argon2 hashing off the async executor.
pub(crate) async fn hash_blocking(hasher: &Arc<PasswordHasher>, password: String) -> AppResult<String> {
    let hasher = Arc::clone(hasher);
    tokio::task::spawn_blocking(move || hasher.hash_password(&password))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
}

async fn verify_blocking(
    hasher: &Arc<PasswordHasher>,
    password: String,
    hash: String,
) -> AppResult<bool> {
    let hasher = Arc::clone(hasher);
    tokio::task::spawn_blocking(move || hasher.verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?
}
