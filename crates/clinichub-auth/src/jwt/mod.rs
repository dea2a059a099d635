//! Session token issuing and verification.

pub mod claims;
pub mod codec;

pub use claims::{ClaimSubject, SessionClaims};
pub use codec::{IssuedToken, SessionTokenCodec, TokenError};
