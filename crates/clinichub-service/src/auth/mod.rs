//! Registration, login and the current-user profile.

pub mod service;

pub use service::{AuthResponse, AuthService, LoginPortal, LoginRequest, RegisterRequest, UserSummary};
