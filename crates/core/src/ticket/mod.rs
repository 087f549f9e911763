//! Ticket domain logic.
//!
//! A ticket is a user's right to attend one session: purchasable once per
//! (user, session), usable once.

pub mod error;
pub mod types;

pub use error::TicketError;
pub use types::{Ticket, TicketFilter};
