//! Audit trail configuration.

use serde::{Deserialize, Serialize};

/// Retention and write behaviour of the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Entries older than this many days are removed by maintenance.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    /// Upper bound on a single audit append, in milliseconds.
    #[serde(default = "default_write_timeout")]
    pub write_timeout_ms: u64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            retention_days: default_retention_days(),
            write_timeout_ms: default_write_timeout(),
        }
    }
}

fn default_retention_days() -> u32 {
    365
}

fn default_write_timeout() -> u64 {
    2000
}
