//! Movie domain error types.

use thiserror::Error;

use cinebook_shared::AppError;

/// Errors raised by movie and session invariant checks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MovieError {
    /// Movie title is empty or whitespace-only.
    #[error("Title cannot be empty")]
    EmptyTitle,

    /// Age restriction outside the allowed range.
    #[error("Age restriction must be between 0 and 21, got {0}")]
    AgeRestrictionOutOfRange(i32),

    /// Session date is not in the future.
    #[error("Session date must be in the future")]
    PastSessionDate,

    /// Room number is not a positive integer.
    #[error("Room number must be a positive integer, got {0}")]
    NonPositiveRoomNumber(i32),

    /// Timeslot is not one of the allowed exhibition windows.
    #[error("Invalid timeslot: {0}")]
    InvalidTimeslot(String),
}

impl From<MovieError> for AppError {
    fn from(err: MovieError) -> Self {
        Self::Validation(err.to_string())
    }
}
