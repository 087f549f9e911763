//! Ticket domain error types.

use thiserror::Error;
use uuid::Uuid;

use cinebook_shared::AppError;

/// Errors raised by ticket state transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TicketError {
    /// The ticket has already been used; "used" is terminal.
    #[error("Ticket {0} has already been used")]
    AlreadyUsed(Uuid),
}

impl From<TicketError> for AppError {
    fn from(err: TicketError) -> Self {
        Self::Conflict(err.to_string())
    }
}
