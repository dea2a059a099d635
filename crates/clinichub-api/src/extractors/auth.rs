//! `AuthUser` and `Authorized<P>` extractors: run the access gate against
//! the `Authorization` header and inject the request identity.

use std::marker::PhantomData;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use clinichub_auth::{RoleRequirement, SessionClaims};
use clinichub_core::error::AppError;
use clinichub_entity::user::UserRole;
use clinichub_service::context::RequestContext;

use crate::extractors::origin::request_origin;
use crate::state::AppState;

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = state.gate.authenticate(authorization(parts))?;
        Ok(AuthUser(into_context(parts, &claims)?))
    }
}

/// Role set attached to a route through [`Authorized`].
pub trait RolePolicy: Send + Sync + 'static {
    const REQUIREMENT: RoleRequirement;
}

/// Admin role only.
#[derive(Debug, Clone, Copy)]
pub struct AdminOnly;

impl RolePolicy for AdminOnly {
    const REQUIREMENT: RoleRequirement = RoleRequirement::Only(UserRole::Admin);
}

/// Admin or doctor.
#[derive(Debug, Clone, Copy)]
pub struct AdminOrDoctor;

impl RolePolicy for AdminOrDoctor {
    const REQUIREMENT: RoleRequirement =
        RoleRequirement::AnyOf(&[UserRole::Admin, UserRole::Doctor]);
}

/// Authenticated user whose role satisfies `P`.
#[derive(Debug, Clone)]
pub struct Authorized<P: RolePolicy> {
    pub ctx: RequestContext,
    _policy: PhantomData<P>,
}

impl<P: RolePolicy> std::ops::Deref for Authorized<P> {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.ctx
    }
}

impl<P: RolePolicy> FromRequestParts<AppState> for Authorized<P> {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = state.gate.authorize(authorization(parts), P::REQUIREMENT)?;
        Ok(Self {
            ctx: into_context(parts, &claims)?,
            _policy: PhantomData,
        })
    }
}

fn authorization(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}

fn into_context(parts: &Parts, claims: &SessionClaims) -> Result<RequestContext, AppError> {
    RequestContext::from_claims(claims, request_origin(parts))
}
