//! Ticket domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::TicketError;

/// Filter for a user's ticket history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketFilter {
    /// All tickets.
    #[default]
    All,
    /// Only used tickets.
    Used,
    /// Only unused tickets.
    Unused,
}

/// A purchased ticket for a movie session.
///
/// `session_id` is optional: deleting a session detaches its tickets
/// rather than deleting them, so the purchase history survives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    /// Ticket ID.
    pub id: Uuid,
    /// Purchasing user.
    pub user_id: Uuid,
    /// The session the ticket admits to, until the session is deleted.
    pub session_id: Option<Uuid>,
    /// Purchase instant.
    pub purchased_at: DateTime<Utc>,
    /// Whether the ticket has been used.
    pub is_used: bool,
    /// When the ticket was used, if ever.
    pub used_at: Option<DateTime<Utc>>,
}

impl Ticket {
    /// Creates a new, unused ticket.
    #[must_use]
    pub fn new(user_id: Uuid, session_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            session_id: Some(session_id),
            purchased_at: Utc::now(),
            is_used: false,
            used_at: None,
        }
    }

    /// Marks the ticket as used. "Used" is a terminal state.
    ///
    /// # Errors
    ///
    /// Returns `TicketError::AlreadyUsed` on a second transition.
    pub fn mark_as_used(&mut self, used_at: DateTime<Utc>) -> Result<(), TicketError> {
        if self.is_used {
            return Err(TicketError::AlreadyUsed(self.id));
        }
        self.is_used = true;
        self.used_at = Some(used_at);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ticket_is_unused() {
        let ticket = Ticket::new(Uuid::new_v4(), Uuid::new_v4());
        assert!(!ticket.is_used);
        assert!(ticket.used_at.is_none());
        assert!(ticket.session_id.is_some());
    }

    #[test]
    fn test_mark_as_used() {
        let mut ticket = Ticket::new(Uuid::new_v4(), Uuid::new_v4());
        let used_at = Utc::now();

        ticket.mark_as_used(used_at).unwrap();
        assert!(ticket.is_used);
        assert_eq!(ticket.used_at, Some(used_at));
    }

    #[test]
    fn test_mark_as_used_twice_conflicts() {
        let mut ticket = Ticket::new(Uuid::new_v4(), Uuid::new_v4());
        ticket.mark_as_used(Utc::now()).unwrap();

        let err = ticket.mark_as_used(Utc::now()).unwrap_err();
        assert_eq!(err, TicketError::AlreadyUsed(ticket.id));

        // The transition is one-way: the first use timestamp survives.
        assert!(ticket.is_used);
    }

    #[test]
    fn test_filter_default_is_all() {
        assert_eq!(TicketFilter::default(), TicketFilter::All);
    }
}
