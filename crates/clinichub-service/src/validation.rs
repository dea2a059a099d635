//! Field checks shared by the services.

use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

use clinichub_core::{AppError, AppResult};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern")
});

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?1?\d{9,15}$").expect("phone pattern"));

/// `local@domain.tld` shape check.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Optional `+`, optional country code `1`, then 9 to 15 digits.
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_PATTERN.is_match(phone)
}

pub fn require_email(email: &str) -> AppResult<()> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(AppError::invalid_input("Invalid email format"))
    }
}

pub fn require_phone(phone: &str) -> AppResult<()> {
    if is_valid_phone(phone) {
        Ok(())
    } else {
        Err(AppError::invalid_input("Invalid phone number format"))
    }
}

/// Trimmed value of a required text field; blank counts as missing.
pub fn required<'a>(field: &str, value: Option<&'a str>) -> AppResult<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::invalid_input(format!("{field} is required"))),
    }
}

/// Parse a resource identifier; anything malformed is `Invalid ID`.
pub fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::invalid_id())
}

/// `None` for absent or blank strings.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last+tag@clinic.co.uk"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("not an email"));
    }

    #[test]
    fn test_phone() {
        assert!(is_valid_phone("+15551234567"));
        assert!(is_valid_phone("5551234567"));
        assert!(!is_valid_phone("555-123-4567"));
        assert!(!is_valid_phone("12345"));
    }

    #[test]
    fn test_required() {
        assert_eq!(required("name", Some("  Ada ")).unwrap(), "Ada");
        assert_eq!(
            required("phone", Some("   ")).unwrap_err().message,
            "phone is required"
        );
        assert!(required("email", None).is_err());
    }

    #[test]
    fn test_parse_id() {
        assert!(parse_id("not-a-uuid").is_err());
        assert_eq!(parse_id("abc").unwrap_err().message, "Invalid ID");
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
    }
}
