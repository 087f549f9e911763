//! User domain logic.

pub mod error;
pub mod types;

pub use error::UserError;
pub use types::{User, UserRole};
