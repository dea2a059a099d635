//! # clinichub-auth
//!
//! Credential handling and request authorization for ClinicHub.
//!
//! ## Modules
//!
//! - `password`: Argon2id hashing and length policy
//! - `jwt`: session token issuing and verification
//! - `gate`: the ordered guard pipeline every protected operation passes

pub mod gate;
pub mod jwt;
pub mod password;

pub use gate::{AccessGate, GateError, Guard, RoleRequirement};
pub use jwt::{ClaimSubject, IssuedToken, SessionClaims, SessionTokenCodec, TokenError};
pub use password::{PasswordHasher, PasswordValidator};
