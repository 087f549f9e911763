//! Ticket repository for database operations.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use cinebook_core::ticket::Ticket;

use crate::entities::tickets;

/// Ticket repository for CRUD operations.
#[derive(Debug, Clone, Copy)]
pub struct TicketRepository;

impl TicketRepository {
    /// Lists all tickets, most recent purchase first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_all(conn: &impl ConnectionTrait) -> Result<Vec<tickets::Model>, DbErr> {
        tickets::Entity::find()
            .order_by_desc(tickets::Column::PurchasedAt)
            .all(conn)
            .await
    }

    /// Finds a ticket by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        conn: &impl ConnectionTrait,
        id: Uuid,
    ) -> Result<Option<tickets::Model>, DbErr> {
        tickets::Entity::find_by_id(id).one(conn).await
    }

    /// Finds the ticket a user holds for a session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_user_and_session(
        conn: &impl ConnectionTrait,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<Option<tickets::Model>, DbErr> {
        tickets::Entity::find()
            .filter(tickets::Column::UserId.eq(user_id))
            .filter(tickets::Column::SessionId.eq(session_id))
            .one(conn)
            .await
    }

    /// Lists all of a user's tickets.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_user(
        conn: &impl ConnectionTrait,
        user_id: Uuid,
    ) -> Result<Vec<tickets::Model>, DbErr> {
        Self::user_tickets(user_id).all(conn).await
    }

    /// Lists a user's used tickets.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_used_by_user(
        conn: &impl ConnectionTrait,
        user_id: Uuid,
    ) -> Result<Vec<tickets::Model>, DbErr> {
        Self::user_tickets(user_id)
            .filter(tickets::Column::IsUsed.eq(true))
            .all(conn)
            .await
    }

    /// Lists a user's unused tickets.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_unused_by_user(
        conn: &impl ConnectionTrait,
        user_id: Uuid,
    ) -> Result<Vec<tickets::Model>, DbErr> {
        Self::user_tickets(user_id)
            .filter(tickets::Column::IsUsed.eq(false))
            .all(conn)
            .await
    }

    /// Inserts a new ticket.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails (including a unique
    /// constraint violation on the user/session pair).
    pub async fn insert(
        conn: &impl ConnectionTrait,
        ticket: &Ticket,
    ) -> Result<tickets::Model, DbErr> {
        tickets::ActiveModel {
            id: Set(ticket.id),
            user_id: Set(ticket.user_id),
            session_id: Set(ticket.session_id),
            purchased_at: Set(ticket.purchased_at.into()),
            is_used: Set(ticket.is_used),
            used_at: Set(ticket.used_at.map(Into::into)),
        }
        .insert(conn)
        .await
    }

    /// Persists the used state of a ticket.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn mark_used(
        conn: &impl ConnectionTrait,
        id: Uuid,
        used_at: DateTime<Utc>,
    ) -> Result<tickets::Model, DbErr> {
        tickets::ActiveModel {
            id: Set(id),
            is_used: Set(true),
            used_at: Set(Some(used_at.into())),
            ..Default::default()
        }
        .update(conn)
        .await
    }

    /// Deletes a ticket by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(conn: &impl ConnectionTrait, id: Uuid) -> Result<(), DbErr> {
        tickets::Entity::delete_by_id(id).exec(conn).await?;
        Ok(())
    }

    fn user_tickets(user_id: Uuid) -> sea_orm::Select<tickets::Entity> {
        tickets::Entity::find()
            .filter(tickets::Column::UserId.eq(user_id))
            .order_by_desc(tickets::Column::PurchasedAt)
    }
}
