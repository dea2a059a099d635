//! # clinichub-api
//!
//! HTTP API layer for ClinicHub built on Axum.
//!
//! Provides the REST endpoints, middleware (logging, CORS, compression,
//! timeouts), typed auth extractors, and response envelopes.

pub mod app;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use state::AppState;
