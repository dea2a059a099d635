//! Authentication configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AuthConfig {
    /// Secret key for session token signing (HMAC-SHA256).
    ///
    /// Has no default; set it in a config file or `CLINICHUB__AUTH__JWT_SECRET`.
    #[serde(default)]
    #[validate(length(min = 16, message = "auth.jwt_secret must be at least 16 characters"))]
    pub jwt_secret: String,
    /// Session token lifetime in hours.
    #[serde(default = "default_token_ttl")]
    #[validate(range(min = 1, max = 720))]
    pub token_ttl_hours: u64,
    /// Clock skew tolerated when checking token expiry.
    #[serde(default = "default_leeway")]
    pub token_leeway_seconds: u64,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    #[validate(range(min = 1))]
    pub password_min_length: usize,
    /// Maximum password length.
    #[serde(default = "default_password_max")]
    pub password_max_length: usize,
    /// Argon2 memory cost in KiB.
    #[serde(default = "default_argon2_memory")]
    #[validate(range(min = 8))]
    pub argon2_memory_kib: u32,
    /// Argon2 iteration count.
    #[serde(default = "default_argon2_iterations")]
    #[validate(range(min = 1))]
    pub argon2_iterations: u32,
    /// Argon2 degree of parallelism.
    #[serde(default = "default_argon2_parallelism")]
    #[validate(range(min = 1))]
    pub argon2_parallelism: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_hours: default_token_ttl(),
            token_leeway_seconds: default_leeway(),
            password_min_length: default_password_min(),
            password_max_length: default_password_max(),
            argon2_memory_kib: default_argon2_memory(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
        }
    }
}

fn default_token_ttl() -> u64 {
    24
}

fn default_leeway() -> u64 {
    5
}

fn default_password_min() -> usize {
    6
}

fn default_password_max() -> usize {
    128
}

fn default_argon2_memory() -> u32 {
    19 * 1024
}

fn default_argon2_iterations() -> u32 {
    2
}

fn default_argon2_parallelism() -> u32 {
    1
}
