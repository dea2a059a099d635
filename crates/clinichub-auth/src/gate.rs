//! Access control gate.
//!
//! A protected operation declares an ordered list of [`Guard`]s. The gate
//! runs them in order against the request's `Authorization` header and
//! either yields the verified [`SessionClaims`] or stops at the first
//! failing guard. The gate never touches a store: every decision comes from
//! the signed claims.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use clinichub_core::error::AppError;
use clinichub_entity::user::UserRole;

use crate::jwt::{SessionClaims, SessionTokenCodec, TokenError};

/// Which roles an operation admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleRequirement {
    Only(UserRole),
    AnyOf(&'static [UserRole]),
}

impl RoleRequirement {
    pub fn admits(&self, role: UserRole) -> bool {
        match self {
            Self::Only(required) => *required == role,
            Self::AnyOf(allowed) => allowed.contains(&role),
        }
    }

    fn denial(&self) -> String {
        match self {
            Self::Only(role) => format!("{role} access only"),
            Self::AnyOf(roles) => {
                let names: Vec<&str> = roles.iter().map(UserRole::as_str).collect();
                format!("{} access required", names.join(" or "))
            }
        }
    }
}

impl fmt::Display for RoleRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Only(role) => write!(f, "{role}"),
            Self::AnyOf(roles) => {
                let names: Vec<&str> = roles.iter().map(UserRole::as_str).collect();
                write!(f, "{}", names.join("|"))
            }
        }
    }
}

/// One step of the gate pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Extract the token from `Authorization: <scheme> <token>`.
    BearerToken,
    /// Verify the extracted token and attach its claims.
    VerifiedClaims,
    /// Require the attached claims to satisfy a role requirement.
    Role(RoleRequirement),
}

/// Terminal outcome of a failing guard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("Token missing")]
    MissingToken,
    #[error("Invalid token format")]
    MalformedHeader,
    #[error("Token expired")]
    Expired,
    #[error("Invalid token")]
    InvalidToken,
    #[error("{0}")]
    Forbidden(String),
}

impl From<GateError> for AppError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::Forbidden(message) => AppError::forbidden(message),
            other => AppError::unauthenticated(other.to_string()),
        }
    }
}

/// Request-scoped state threaded through the guards.
#[derive(Debug)]
struct GatePass<'h> {
    header: Option<&'h str>,
    token: Option<&'h str>,
    claims: Option<SessionClaims>,
}

/// Evaluates guard pipelines against the shared token codec.
#[derive(Debug, Clone)]
pub struct AccessGate {
    codec: Arc<SessionTokenCodec>,
}

impl AccessGate {
    /// Pipeline for operations that only need a valid session.
    pub const AUTHENTICATED: [Guard; 2] = [Guard::BearerToken, Guard::VerifiedClaims];

    pub fn new(codec: Arc<SessionTokenCodec>) -> Self {
        Self { codec }
    }

    /// The codec used by [`Guard::VerifiedClaims`].
    pub fn codec(&self) -> &SessionTokenCodec {
        &self.codec
    }

    /// Pipeline for operations restricted to `requirement`.
    pub fn role_pipeline(requirement: RoleRequirement) -> [Guard; 3] {
        [
            Guard::BearerToken,
            Guard::VerifiedClaims,
            Guard::Role(requirement),
        ]
    }

    /// Run `guards` in order. The pipeline must include
    /// [`Guard::VerifiedClaims`] for claims to be produced.
    pub fn evaluate(
        &self,
        guards: &[Guard],
        authorization: Option<&str>,
    ) -> Result<SessionClaims, GateError> {
        let mut pass = GatePass {
            header: authorization,
            token: None,
            claims: None,
        };
        for guard in guards {
            self.check(*guard, &mut pass)?;
        }
        pass.claims.ok_or(GateError::MissingToken)
    }

    /// Shorthand for [`AccessGate::AUTHENTICATED`].
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<SessionClaims, GateError> {
        self.evaluate(&Self::AUTHENTICATED, authorization)
    }

    /// Shorthand for a role-restricted pipeline.
    pub fn authorize(
        &self,
        authorization: Option<&str>,
        requirement: RoleRequirement,
    ) -> Result<SessionClaims, GateError> {
        self.evaluate(&Self::role_pipeline(requirement), authorization)
    }

    fn check<'h>(&self, guard: Guard, pass: &mut GatePass<'h>) -> Result<(), GateError> {
        match guard {
            Guard::BearerToken => {
                let header = pass.header.ok_or(GateError::MissingToken)?;
                if header.is_empty() {
                    return Err(GateError::MissingToken);
                }
                // The scheme word itself is not checked.
                let token = header
                    .split_whitespace()
                    .nth(1)
                    .ok_or(GateError::MalformedHeader)?;
                pass.token = Some(token);
                Ok(())
            }
            Guard::VerifiedClaims => {
                let token = pass.token.ok_or(GateError::MissingToken)?;
                let claims = self.codec.verify(token).map_err(|e| match e {
                    TokenError::Expired => GateError::Expired,
                    TokenError::Missing => GateError::MissingToken,
                    _ => GateError::InvalidToken,
                })?;
                pass.claims = Some(claims);
                Ok(())
            }
            Guard::Role(requirement) => {
                let claims = pass.claims.as_ref().ok_or(GateError::MissingToken)?;
                if requirement.admits(claims.role) {
                    Ok(())
                } else {
                    tracing::debug!(
                        user_id = %claims.user_id,
                        role = %claims.role,
                        required = %requirement,
                        "Role requirement not met"
                    );
                    Err(GateError::Forbidden(requirement.denial()))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use clinichub_core::error::ErrorKind;
    use uuid::Uuid;

    use super::*;
    use crate::jwt::ClaimSubject;

    const ADMIN_OR_DOCTOR: RoleRequirement =
        RoleRequirement::AnyOf(&[UserRole::Admin, UserRole::Doctor]);

    fn gate() -> AccessGate {
        AccessGate::new(Arc::new(SessionTokenCodec::new(
            "gate-test-secret-0123456789",
            Duration::hours(24),
            0,
        )))
    }

    fn bearer(gate: &AccessGate, role: UserRole) -> String {
        let subject = ClaimSubject {
            user_id: Uuid::new_v4(),
            email: format!("{role}@clinic.test"),
            name: "Tester".into(),
            role,
        };
        format!("Bearer {}", gate.codec().issue(&subject).unwrap().token)
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(gate().authenticate(None), Err(GateError::MissingToken));
        assert_eq!(gate().authenticate(Some("")), Err(GateError::MissingToken));
    }

    #[test]
    fn test_header_without_token_segment() {
        assert_eq!(
            gate().authenticate(Some("Bearer")),
            Err(GateError::MalformedHeader)
        );
    }

    #[test]
    fn test_scheme_word_is_not_checked() {
        let gate = gate();
        let header = bearer(&gate, UserRole::Staff).replacen("Bearer", "Token", 1);
        assert!(gate.authenticate(Some(&header)).is_ok());
    }

    #[test]
    fn test_invalid_and_expired_tokens() {
        let gate = gate();
        assert_eq!(
            gate.authenticate(Some("Bearer garbage")),
            Err(GateError::InvalidToken)
        );

        let subject = ClaimSubject {
            user_id: Uuid::new_v4(),
            email: "old@clinic.test".into(),
            name: "Old".into(),
            role: UserRole::Admin,
        };
        let stale = gate
            .codec()
            .issue_at(&subject, Utc::now() - Duration::hours(48))
            .unwrap();
        assert_eq!(
            gate.authenticate(Some(&format!("Bearer {}", stale.token))),
            Err(GateError::Expired)
        );
    }

    #[test]
    fn test_role_requirement() {
        let gate = gate();
        let nurse = bearer(&gate, UserRole::Nurse);
        let admin = bearer(&gate, UserRole::Admin);

        assert_eq!(
            gate.authorize(Some(&nurse), RoleRequirement::Only(UserRole::Admin)),
            Err(GateError::Forbidden("admin access only".into()))
        );
        let claims = gate
            .authorize(Some(&admin), RoleRequirement::Only(UserRole::Admin))
            .unwrap();
        assert_eq!(claims.role, UserRole::Admin);
    }

    #[test]
    fn test_role_set() {
        let gate = gate();
        let doctor = bearer(&gate, UserRole::Doctor);
        let pharmacist = bearer(&gate, UserRole::Pharmacist);

        assert!(gate.authorize(Some(&doctor), ADMIN_OR_DOCTOR).is_ok());
        assert_eq!(
            gate.authorize(Some(&pharmacist), ADMIN_OR_DOCTOR),
            Err(GateError::Forbidden("admin or doctor access required".into()))
        );
    }

    #[test]
    fn test_guards_stop_at_first_failure() {
        // Without a token the role guard is never reached.
        assert_eq!(
            gate().authorize(None, RoleRequirement::Only(UserRole::Admin)),
            Err(GateError::MissingToken)
        );
    }

    #[test]
    fn test_error_mapping() {
        let forbidden: AppError = GateError::Forbidden("admin access only".into()).into();
        assert_eq!(forbidden.kind, ErrorKind::Forbidden);

        let expired: AppError = GateError::Expired.into();
        assert_eq!(expired.kind, ErrorKind::Unauthenticated);
        assert_eq!(expired.message, "Token expired");
    }
}
