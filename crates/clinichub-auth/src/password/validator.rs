//! Password length policy for new passwords.

use clinichub_core::config::AuthConfig;
use clinichub_core::error::AppError;

/// Enforces the configured password length bounds.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
    max_length: usize,
}

impl PasswordValidator {
    pub fn new(min_length: usize, max_length: usize) -> Self {
        Self {
            min_length,
            max_length,
        }
    }

    /// Create a validator from auth configuration.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.password_min_length, config.password_max_length)
    }

    /// Length is counted in characters, not bytes.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        let length = password.chars().count();
        if length < self.min_length {
            return Err(AppError::invalid_input(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }
        if length > self.max_length {
            return Err(AppError::invalid_input(format!(
                "Password must be at most {} characters long",
                self.max_length
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let validator = PasswordValidator::new(6, 128);
        assert!(validator.validate("").is_err());
        assert!(validator.validate("12345").is_err());
        assert!(validator.validate("secret1").is_ok());
        assert!(validator.validate(&"x".repeat(128)).is_ok());
        assert!(validator.validate(&"x".repeat(129)).is_err());
    }

    #[test]
    fn test_counts_characters() {
        let validator = PasswordValidator::new(6, 128);
        // Six characters, twelve bytes.
        assert!(validator.validate("éééééé").is_ok());
    }
}
