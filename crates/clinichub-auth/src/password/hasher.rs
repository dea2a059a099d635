//! Argon2id password hashing and verification.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use clinichub_core::config::AuthConfig;
use clinichub_core::error::AppError;

/// Argon2id hasher with a configurable work factor.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Create a hasher with explicit cost parameters.
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, AppError> {
        let params = Params::new(memory_kib, iterations, parallelism, None).map_err(|e| {
            AppError::configuration(format!("Invalid Argon2 parameters: {e}"))
        })?;
        Ok(Self { params })
    }

    /// Create a hasher from auth configuration.
    pub fn from_config(config: &AuthConfig) -> Result<Self, AppError> {
        Self::new(
            config.argon2_memory_kib,
            config.argon2_iterations,
            config.argon2_parallelism,
        )
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash `password` with a fresh random salt.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Check `password` against a stored hash.
    ///
    /// Parameters embedded in the hash are used, so hashes made with older
    /// cost settings still verify. Returns `Ok(false)` on mismatch.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid password hash format: {e}")))?;

        match self.argon2().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(8, 1, 1).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = hasher();
        let hash = hasher.hash_password("secret1").unwrap();

        assert!(!hash.contains("secret1"));
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password("secret1", &hash).unwrap());
        assert!(!hasher.verify_password("secret2", &hash).unwrap());
    }

    #[test]
    fn test_salt_differs_per_hash() {
        let hasher = hasher();
        let a = hasher.hash_password("secret1").unwrap();
        let b = hasher.hash_password("secret1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verifies_hash_made_with_other_cost() {
        let strong = PasswordHasher::new(64, 2, 1).unwrap();
        let hash = strong.hash_password("secret1").unwrap();
        assert!(hasher().verify_password("secret1", &hash).unwrap());
    }

    #[test]
    fn test_rejects_garbage_hash() {
        assert!(hasher().verify_password("secret1", "plaintext").is_err());
    }

    #[test]
    fn test_invalid_params() {
        assert!(PasswordHasher::new(8, 0, 1).is_err());
    }
}
