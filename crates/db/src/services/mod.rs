//! Application services owning the transaction boundaries.
//!
//! Each write-bearing operation opens a database transaction, performs its
//! reads and writes against that transactional view, and commits as a
//! unit. Errors propagate with `?`, dropping the transaction, which rolls
//! it back; nothing is half-applied.

pub mod auth;
pub mod movie;
pub mod ticket;
pub mod user;

pub use auth::AuthService;
pub use movie::{
    BulkCreateMoviesInput, BulkCreateSessionsInput, BulkDeleteMoviesInput, BulkDeleteSessionsInput,
    CreateMovieInput, CreateSessionInput, MovieResponse, MovieService, MovieSessionResponse,
    MovieWithSessionsResponse, UpdateMovieInput,
};
pub use ticket::{BuyTicketInput, TicketResponse, TicketService, UserTicketsQuery};
pub use user::{UserResponse, UserService, UserWithTicketsResponse};

use cinebook_shared::AppError;
use sea_orm::{DbErr, SqlErr};

/// Maps a database error into the application taxonomy.
pub(crate) fn db_err(err: DbErr) -> AppError {
    AppError::Database(err.to_string())
}

/// Maps an insert error, translating a unique-constraint violation into a
/// Conflict so a lost race still surfaces as 409 rather than 500.
pub(crate) fn insert_err(err: DbErr, conflict: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(conflict.to_string()),
        _ => AppError::Database(err.to_string()),
    }
}
