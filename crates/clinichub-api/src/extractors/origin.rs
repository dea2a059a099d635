//! Network origin of a request, recorded on audit entries.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::header::USER_AGENT;
use axum::http::request::Parts;

use clinichub_service::context::RequestOrigin;

/// Origin of a request that may be unauthenticated.
#[derive(Debug, Clone, Default)]
pub struct ClientOrigin(pub RequestOrigin);

impl<S: Send + Sync> FromRequestParts<S> for ClientOrigin {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientOrigin(request_origin(parts)))
    }
}

/// First `X-Forwarded-For` hop, else the peer address when the server
/// was started with connect info.
pub(crate) fn request_origin(parts: &Parts) -> RequestOrigin {
    let forwarded = parts
        .headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from);

    let ip_address = forwarded.or_else(|| {
        parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
    });

    let user_agent = parts
        .headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    RequestOrigin::new(ip_address, user_agent)
}
