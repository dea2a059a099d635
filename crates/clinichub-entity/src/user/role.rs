//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed set of staff roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Clinic administrator.
    Admin,
    /// Physician.
    Doctor,
    /// Nursing staff.
    Nurse,
    /// Front desk.
    Receptionist,
    /// Pharmacy staff.
    Pharmacist,
    /// Default role for self-registered accounts.
    Staff,
}

impl UserRole {
    /// Every role, in display order.
    pub const ALL: [UserRole; 6] = [
        Self::Admin,
        Self::Doctor,
        Self::Nurse,
        Self::Receptionist,
        Self::Pharmacist,
        Self::Staff,
    ];

    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Doctor => "doctor",
            Self::Nurse => "nurse",
            Self::Receptionist => "receptionist",
            Self::Pharmacist => "pharmacist",
            Self::Staff => "staff",
        }
    }
}

impl Default for UserRole {
    fn default() -> Self {
        Self::Staff
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = clinichub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "doctor" => Ok(Self::Doctor),
            "nurse" => Ok(Self::Nurse),
            "receptionist" => Ok(Self::Receptionist),
            "pharmacist" => Ok(Self::Pharmacist),
            "staff" => Ok(Self::Staff),
            _ => Err(clinichub_core::AppError::invalid_input(format!(
                "Invalid user role: '{s}'. Expected one of: admin, doctor, nurse, receptionist, pharmacist, staff"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("Pharmacist".parse::<UserRole>().unwrap(), UserRole::Pharmacist);
        assert!("patient".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_display_round_trips_every_role() {
        for role in UserRole::ALL {
            assert_eq!(role.to_string().parse::<UserRole>().unwrap(), role);
        }
    }
}
