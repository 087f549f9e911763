//! Ticket service: purchase, one-way use transition, history reads.

use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use cinebook_core::ticket::{Ticket, TicketFilter};
use cinebook_shared::{AppError, AppResult};

use super::{db_err, insert_err};
use crate::entities::tickets;
use crate::repositories::{MovieSessionRepository, TicketRepository, UserRepository};

/// Ticket fields returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
    /// Ticket ID.
    pub id: Uuid,
    /// Purchasing user.
    pub user_id: Uuid,
    /// The session the ticket admits to; null once the session is deleted.
    pub session_id: Option<Uuid>,
    /// Purchase instant.
    pub purchased_at: DateTime<Utc>,
    /// Whether the ticket has been used.
    pub is_used: bool,
    /// When the ticket was used, if ever.
    pub used_at: Option<DateTime<Utc>>,
}

impl From<tickets::Model> for TicketResponse {
    fn from(model: tickets::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            session_id: model.session_id,
            purchased_at: model.purchased_at.with_timezone(&Utc),
            is_used: model.is_used,
            used_at: model.used_at.map(|t| t.with_timezone(&Utc)),
        }
    }
}

/// Request payload for buying a ticket.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyTicketInput {
    /// The buying user (must match the authenticated principal).
    pub user_id: Uuid,
    /// The session to attend.
    pub session_id: Uuid,
}

/// Query options for a user's ticket history.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTicketsQuery {
    /// Restrict to used or unused tickets; defaults to all.
    #[serde(default)]
    pub filter_by_use: TicketFilter,
}

/// Ticket lifecycle service.
#[derive(Debug, Clone)]
pub struct TicketService {
    db: DatabaseConnection,
}

impl TicketService {
    /// Creates a new ticket service.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists every ticket in the system.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_tickets(&self) -> AppResult<Vec<TicketResponse>> {
        let rows = TicketRepository::find_all(&self.db).await.map_err(db_err)?;
        Ok(rows.into_iter().map(TicketResponse::from).collect())
    }

    /// Buys a ticket for a session.
    ///
    /// One transaction: the user must exist, the session must exist, and
    /// the user must not already hold a ticket for it. The unique
    /// (user, session) index backstops the pre-check across transactions.
    ///
    /// # Errors
    ///
    /// `NotFound` for a missing user or session, `Conflict` for a repeat
    /// purchase.
    pub async fn buy_ticket(&self, user_id: Uuid, session_id: Uuid) -> AppResult<TicketResponse> {
        let txn = self.db.begin().await.map_err(db_err)?;

        if UserRepository::find_by_id(&txn, user_id)
            .await
            .map_err(db_err)?
            .is_none()
        {
            return Err(AppError::NotFound(format!("User {user_id} not found")));
        }

        if MovieSessionRepository::find_by_id(&txn, session_id)
            .await
            .map_err(db_err)?
            .is_none()
        {
            return Err(AppError::NotFound(format!(
                "Movie session {session_id} not found"
            )));
        }

        if TicketRepository::find_by_user_and_session(&txn, user_id, session_id)
            .await
            .map_err(db_err)?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "User {user_id} has already purchased a ticket for session {session_id}"
            )));
        }

        let ticket = Ticket::new(user_id, session_id);
        let model = TicketRepository::insert(&txn, &ticket).await.map_err(|e| {
            insert_err(
                e,
                &format!("User {user_id} has already purchased a ticket for session {session_id}"),
            )
        })?;

        txn.commit().await.map_err(db_err)?;

        info!(ticket_id = %model.id, user_id = %user_id, session_id = %session_id, "Ticket purchased");
        Ok(model.into())
    }

    /// Marks a ticket as used. "Used" is terminal; a second call conflicts.
    ///
    /// # Errors
    ///
    /// `NotFound` for a missing ticket, `Conflict` when already used.
    pub async fn use_ticket(&self, ticket_id: Uuid) -> AppResult<TicketResponse> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let model = TicketRepository::find_by_id(&txn, ticket_id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| AppError::NotFound(format!("Ticket {ticket_id} not found")))?;

        let mut ticket = to_domain(&model);
        let now = Utc::now();
        ticket.mark_as_used(now)?;

        let updated = TicketRepository::mark_used(&txn, ticket.id, now)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        info!(ticket_id = %ticket_id, "Ticket used");
        Ok(updated.into())
    }

    /// Deletes (cancels) a ticket.
    ///
    /// # Errors
    ///
    /// `NotFound` for a missing ticket.
    pub async fn delete_ticket(&self, ticket_id: Uuid) -> AppResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;

        if TicketRepository::find_by_id(&txn, ticket_id)
            .await
            .map_err(db_err)?
            .is_none()
        {
            return Err(AppError::NotFound(format!("Ticket {ticket_id} not found")));
        }

        TicketRepository::delete(&txn, ticket_id)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        info!(ticket_id = %ticket_id, "Ticket deleted");
        Ok(())
    }

    /// Returns a user's ticket history, optionally filtered by use state.
    ///
    /// # Errors
    ///
    /// `NotFound` when the user does not exist.
    pub async fn get_user_tickets(
        &self,
        user_id: Uuid,
        filter: TicketFilter,
    ) -> AppResult<Vec<TicketResponse>> {
        self.get_user_tickets_on(&self.db, user_id, filter).await
    }

    /// Same as [`Self::get_user_tickets`], against an explicit connection.
    ///
    /// # Errors
    ///
    /// `NotFound` when the user does not exist.
    pub async fn get_user_tickets_on(
        &self,
        conn: &impl ConnectionTrait,
        user_id: Uuid,
        filter: TicketFilter,
    ) -> AppResult<Vec<TicketResponse>> {
        if UserRepository::find_by_id(conn, user_id)
            .await
            .map_err(db_err)?
            .is_none()
        {
            return Err(AppError::NotFound(format!("User {user_id} not found")));
        }

        let rows = match filter {
            TicketFilter::All => TicketRepository::find_by_user(conn, user_id).await,
            TicketFilter::Used => TicketRepository::find_used_by_user(conn, user_id).await,
            TicketFilter::Unused => TicketRepository::find_unused_by_user(conn, user_id).await,
        }
        .map_err(db_err)?;

        Ok(rows.into_iter().map(TicketResponse::from).collect())
    }
}

fn to_domain(model: &tickets::Model) -> Ticket {
    Ticket {
        id: model.id,
        user_id: model.user_id,
        session_id: model.session_id,
        purchased_at: model.purchased_at.with_timezone(&Utc),
        is_used: model.is_used,
        used_at: model.used_at.map(|t| t.with_timezone(&Utc)),
    }
}
