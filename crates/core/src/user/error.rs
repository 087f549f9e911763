//! User domain error types.

use thiserror::Error;

use cinebook_shared::AppError;

/// Errors raised by user invariant checks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UserError {
    /// Role string is not one of the allowed roles.
    #[error("Invalid user role: {0}")]
    InvalidRole(String),

    /// Username is empty or whitespace-only.
    #[error("Username cannot be empty")]
    EmptyUsername,

    /// Age is negative.
    #[error("Age must be non-negative, got {0}")]
    NegativeAge(i32),
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        Self::Validation(err.to_string())
    }
}
