//! Response types for API endpoints.

use serde::{Deserialize, Serialize};

/// Standard API error response body.
///
/// Every failure carries a stable machine-readable `error` kind and a
/// human-readable `message`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error kind (e.g. `"INVALID_INPUT"`).
    pub error: String,
    /// Human-readable message.
    pub message: String,
}
