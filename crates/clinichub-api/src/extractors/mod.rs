//! Custom Axum extractors.

pub mod auth;
pub mod origin;
pub mod pagination;
pub mod path;

pub use auth::{AdminOnly, AdminOrDoctor, AuthUser, Authorized, RolePolicy};
pub use origin::ClientOrigin;
pub use pagination::ListParams;
pub use path::PathId;
