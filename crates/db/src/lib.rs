//! Database layer with `SeaORM` entities, repositories, and services.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access (pool or caller-owned
//!   transaction, via `ConnectionTrait`)
//! - Application services owning the transaction boundaries
//! - Database migrations
//! - The shared TTL response cache

pub mod cache;
pub mod entities;
pub mod migration;
pub mod repositories;
pub mod services;

pub use cache::ResponseCache;
pub use repositories::{
    MovieRepository, MovieSessionRepository, RefreshTokenRepository, TicketRepository,
    UserRepository, UserSessionRepository,
};
pub use services::{AuthService, MovieService, TicketService, UserService};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
