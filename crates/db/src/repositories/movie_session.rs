//! Movie session repository for database operations.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Deserialize;
use uuid::Uuid;

use cinebook_core::movie::MovieSession;

use super::{SortOrder, default_page, default_per_page};
use crate::entities::movie_sessions;

/// Sortable session fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionSortField {
    /// Sort by exhibition date.
    Date,
    /// Sort by timeslot.
    Timeslot,
    /// Sort by room number.
    RoomNumber,
}

impl From<SessionSortField> for movie_sessions::Column {
    fn from(field: SessionSortField) -> Self {
        match field {
            SessionSortField::Date => Self::Date,
            SessionSortField::Timeslot => Self::Timeslot,
            SessionSortField::RoomNumber => Self::RoomNumber,
        }
    }
}

/// Query options for listing sessions.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionQuery {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// Field to sort by.
    #[serde(default)]
    pub sort: Option<SessionSortField>,
    /// Sort direction.
    #[serde(default)]
    pub order: Option<SortOrder>,
    /// Filter by exact exhibition date.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    /// Filter by timeslot.
    #[serde(default)]
    pub timeslot: Option<String>,
    /// Filter by room number.
    #[serde(default)]
    pub room_number: Option<i32>,
}

impl Default for SessionQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
            sort: None,
            order: None,
            date: None,
            timeslot: None,
            room_number: None,
        }
    }
}

impl SessionQuery {
    /// Query for fetching every session of a movie in one page.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            per_page: 9_999,
            ..Self::default()
        }
    }
}

/// Movie session repository for CRUD operations.
#[derive(Debug, Clone, Copy)]
pub struct MovieSessionRepository;

impl MovieSessionRepository {
    /// Finds a session by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        conn: &impl ConnectionTrait,
        id: Uuid,
    ) -> Result<Option<movie_sessions::Model>, DbErr> {
        movie_sessions::Entity::find_by_id(id).one(conn).await
    }

    /// Lists sessions of one movie, returning the page and total count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_movie(
        conn: &impl ConnectionTrait,
        movie_id: Uuid,
        query: &SessionQuery,
    ) -> Result<(Vec<movie_sessions::Model>, u64), DbErr> {
        let select = Self::filtered(query).filter(movie_sessions::Column::MovieId.eq(movie_id));
        Self::paginate(conn, select, query).await
    }

    /// Lists all sessions, returning the page and total count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_all(
        conn: &impl ConnectionTrait,
        query: &SessionQuery,
    ) -> Result<(Vec<movie_sessions::Model>, u64), DbErr> {
        Self::paginate(conn, Self::filtered(query), query).await
    }

    /// Checks whether a room is free at the given date and timeslot.
    ///
    /// Best-effort: the unique booking index is the actual guarantee.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn is_room_available(
        conn: &impl ConnectionTrait,
        date: DateTime<Utc>,
        timeslot: &str,
        room_number: i32,
    ) -> Result<bool, DbErr> {
        let count = movie_sessions::Entity::find()
            .filter(movie_sessions::Column::Date.eq(date))
            .filter(movie_sessions::Column::Timeslot.eq(timeslot))
            .filter(movie_sessions::Column::RoomNumber.eq(room_number))
            .count(conn)
            .await?;

        Ok(count == 0)
    }

    /// Inserts a validated session.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails (including a unique
    /// constraint violation on the booking index).
    pub async fn insert(
        conn: &impl ConnectionTrait,
        session: &MovieSession,
    ) -> Result<movie_sessions::Model, DbErr> {
        movie_sessions::ActiveModel {
            id: Set(session.id),
            movie_id: Set(session.movie_id),
            date: Set(session.date.into()),
            timeslot: Set(session.timeslot.to_string()),
            room_number: Set(session.room_number),
            created_at: Set(session.created_at.into()),
            updated_at: Set(session.updated_at.into()),
        }
        .insert(conn)
        .await
    }

    /// Deletes a session by ID; tickets are detached at the database level.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(conn: &impl ConnectionTrait, id: Uuid) -> Result<(), DbErr> {
        movie_sessions::Entity::delete_by_id(id).exec(conn).await?;
        Ok(())
    }

    fn filtered(query: &SessionQuery) -> sea_orm::Select<movie_sessions::Entity> {
        let mut select = movie_sessions::Entity::find();

        if let Some(date) = query.date {
            select = select.filter(movie_sessions::Column::Date.eq(date));
        }
        if let Some(timeslot) = &query.timeslot {
            select = select.filter(movie_sessions::Column::Timeslot.eq(timeslot));
        }
        if let Some(room) = query.room_number {
            select = select.filter(movie_sessions::Column::RoomNumber.eq(room));
        }
        if let Some(sort) = query.sort {
            let order = query.order.unwrap_or(SortOrder::Asc);
            select = select.order_by(movie_sessions::Column::from(sort), order.into());
        }

        select
    }

    async fn paginate(
        conn: &impl ConnectionTrait,
        select: sea_orm::Select<movie_sessions::Entity>,
        query: &SessionQuery,
    ) -> Result<(Vec<movie_sessions::Model>, u64), DbErr> {
        let total = select.clone().count(conn).await?;
        let page = u64::from(query.page.max(1));
        let per_page = u64::from(query.per_page);
        let rows = select
            .offset((page - 1) * per_page)
            .limit(per_page)
            .all(conn)
            .await?;

        Ok((rows, total))
    }
}
