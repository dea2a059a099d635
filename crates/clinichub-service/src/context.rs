//! Request context carrying the authenticated identity and caller origin.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use clinichub_auth::SessionClaims;
use clinichub_core::AppResult;
use clinichub_entity::audit::AuditActor;
use clinichub_entity::user::UserRole;

/// Network origin of a request, recorded on audit entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOrigin {
    /// Client IP address, if known.
    pub ip_address: Option<String>,
    /// `User-Agent` header value.
    pub user_agent: Option<String>,
}

impl RequestOrigin {
    pub fn new(ip_address: Option<String>, user_agent: Option<String>) -> Self {
        Self {
            ip_address,
            user_agent,
        }
    }
}

/// Context for the current authenticated request.
///
/// Built from verified session claims by the HTTP layer and passed into
/// service methods so that every operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// Email from the token.
    pub email: String,
    /// Display name from the token.
    pub name: String,
    /// The user's role at the time the token was issued.
    pub role: UserRole,
    /// Where the request came from.
    pub origin: RequestOrigin,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Builds a context from verified claims.
    pub fn from_claims(claims: &SessionClaims, origin: RequestOrigin) -> AppResult<Self> {
        Ok(Self {
            user_id: claims.user_uuid()?,
            email: claims.email.clone(),
            name: claims.name.clone(),
            role: claims.role,
            origin,
            request_time: Utc::now(),
        })
    }

    /// The audit actor for this request.
    pub fn actor(&self) -> AuditActor {
        AuditActor::User(self.user_id)
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
