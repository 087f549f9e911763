//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations, hiding
//! the `SeaORM` implementation details from the rest of the application.
//! Every method takes a `ConnectionTrait` implementor, so the same
//! operation runs either directly against the pool or inside a
//! caller-owned transaction.

pub mod movie;
pub mod movie_session;
pub mod refresh_token;
pub mod ticket;
pub mod user;
pub mod user_session;

pub use movie::{MovieQuery, MovieRepository, MovieSortField};
pub use movie_session::{MovieSessionRepository, SessionQuery, SessionSortField};
pub use refresh_token::RefreshTokenRepository;
pub use ticket::TicketRepository;
pub use user::UserRepository;
pub use user_session::UserSessionRepository;

use serde::Deserialize;

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl From<SortOrder> for sea_orm::Order {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Asc => Self::Asc,
            SortOrder::Desc => Self::Desc,
        }
    }
}

pub(crate) fn default_page() -> u32 {
    1
}

pub(crate) fn default_per_page() -> u32 {
    25
}
