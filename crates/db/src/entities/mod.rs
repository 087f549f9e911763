//! `SeaORM` entity definitions.

pub mod movie_sessions;
pub mod movies;
pub mod refresh_tokens;
pub mod sea_orm_active_enums;
pub mod tickets;
pub mod user_sessions;
pub mod users;
