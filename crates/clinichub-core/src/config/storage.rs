//! Document and backup storage configuration.

use serde::{Deserialize, Serialize};

/// Where uploaded documents and backup archives are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for uploaded patient documents.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    /// Directory for JSON backup exports.
    #[serde(default = "default_backup_dir")]
    pub backup_dir: String,
    /// Maximum accepted request body for uploads, in bytes.
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Lowercase file extensions accepted for upload.
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            backup_dir: default_backup_dir(),
            max_upload_size_bytes: default_max_upload(),
            allowed_extensions: default_allowed_extensions(),
        }
    }
}

fn default_upload_dir() -> String {
    "data/uploads".to_string()
}

fn default_backup_dir() -> String {
    "data/backups".to_string()
}

fn default_max_upload() -> u64 {
    16 * 1024 * 1024
}

fn default_allowed_extensions() -> Vec<String> {
    ["txt", "pdf", "png", "jpg", "jpeg", "gif", "doc", "docx"]
        .into_iter()
        .map(String::from)
        .collect()
}
