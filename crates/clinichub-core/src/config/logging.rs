//! `[logging]` section.

use serde::{Deserialize, Serialize};

/// Subscriber settings applied once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `clinichub=debug,info`. `RUST_LOG` wins
    /// when set.
    #[serde(default = "default_level")]
    pub level: String,
    /// `json` for production, anything else prints human-readable lines.
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "json".to_string()
}
