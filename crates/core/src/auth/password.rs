//! Password hashing with Argon2id.
//!
//! Uses the recommended Argon2id variant with secure defaults. Plaintext
//! passwords must satisfy the account password policy before hashing.

use argon2::{
    Argon2, PasswordHash,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

use cinebook_shared::AppError;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Password does not satisfy the policy.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters and contain a number")]
    TooWeak,

    /// Failed to hash password.
    #[error("failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password.
    #[error("failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format.
    #[error("invalid password hash format")]
    InvalidHash,
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::TooWeak => Self::Validation(err.to_string()),
            PasswordError::HashError(_) | PasswordError::VerifyError(_) => {
                Self::Internal(err.to_string())
            }
            PasswordError::InvalidHash => Self::Unauthorized(err.to_string()),
        }
    }
}

/// Returns true if the plaintext satisfies the password policy:
/// minimum length and at least one digit.
#[must_use]
pub fn meets_policy(plain: &str) -> bool {
    plain.chars().count() >= MIN_PASSWORD_LENGTH && plain.chars().any(|c| c.is_ascii_digit())
}

/// Hashes a password using Argon2id.
///
/// The plaintext is checked against the password policy first.
///
/// # Errors
///
/// Returns `PasswordError::TooWeak` if the policy is not met.
/// Returns `PasswordError::HashError` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    if !meets_policy(password) {
        return Err(PasswordError::TooWeak);
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

/// Verifies a password against a hash.
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` if the hash format is invalid.
/// Returns `PasswordError::VerifyError` if verification fails unexpectedly.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        let password = "test_password_123";
        let hash = hash_password(password).unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert_ne!(hash, password);
    }

    #[test]
    fn test_verify_correct_password() {
        let password = "correct_password1";
        let hash = hash_password(password).unwrap();

        assert!(verify_password(password, &hash).unwrap());
    }

    #[test]
    fn test_verify_wrong_password() {
        let password = "correct_password1";
        let hash = hash_password(password).unwrap();

        assert!(!verify_password("wrong_password1", &hash).unwrap());
    }

    #[test]
    fn test_rejects_short_password() {
        assert!(matches!(hash_password("ab1"), Err(PasswordError::TooWeak)));
    }

    #[test]
    fn test_rejects_password_without_digit() {
        assert!(matches!(
            hash_password("longenoughpassword"),
            Err(PasswordError::TooWeak)
        ));
    }

    #[test]
    fn test_different_passwords_different_hashes() {
        let hash1 = hash_password("password12345").unwrap();
        let hash2 = hash_password("password12345").unwrap();

        // Same password should produce different hashes (due to random salt)
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_invalid_hash_format() {
        let result = verify_password("password1", "invalid_hash");
        assert!(matches!(result, Err(PasswordError::InvalidHash)));
    }
}
