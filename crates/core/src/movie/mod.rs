//! Movie domain logic.
//!
//! Movies and their scheduled sessions, with invariant-checking
//! constructors and the fixed exhibition timeslot grid.

pub mod error;
pub mod types;

pub use error::MovieError;
pub use types::{Movie, MovieSession, Timeslot};
