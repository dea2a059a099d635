//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::UserRole;

/// A staff account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Login key, stored trimmed and lowercased.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Argon2 password hash.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Assigned role.
    pub role: UserRole,
    /// Inactive accounts cannot log in.
    pub is_active: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// Last successful login time.
    #[serde(rename = "lastLogin")]
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Check if the user can log in right now.
    pub fn can_login(&self) -> bool {
        self.is_active
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Normalized email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Assigned role.
    pub role: UserRole,
    /// Whether the account starts active.
    pub is_active: bool,
}

/// Normalize an email into its stored, login-key form.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Filter for the admin staff listing.
#[derive(Debug, Clone, Default)]
pub struct StaffFilter {
    /// Only users with this role.
    pub role: Option<UserRole>,
    /// Case-insensitive substring over name and email.
    pub search: Option<String>,
}

impl StaffFilter {
    /// In-process evaluation of the filter.
    pub fn matches(&self, user: &User) -> bool {
        if let Some(role) = self.role {
            if user.role != role {
                return false;
            }
        }
        match self.search.as_deref() {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                user.name.to_lowercase().contains(&needle)
                    || user.email.to_lowercase().contains(&needle)
            }
            _ => true,
        }
    }
}
