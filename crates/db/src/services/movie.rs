//! Movie service: catalog CRUD, scheduled sessions, and cache
//! invalidation.
//!
//! Bulk operations run sequentially inside one transaction; the first
//! failure aborts and rolls back the whole batch. Every mutation clears
//! the response cache after commit.

use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use cinebook_core::movie::{Movie, MovieSession};
use cinebook_shared::types::PageResponse;
use cinebook_shared::{AppError, AppResult};

use super::{db_err, insert_err};
use crate::cache::ResponseCache;
use crate::entities::{movie_sessions, movies};
use crate::repositories::{MovieQuery, MovieRepository, MovieSessionRepository, SessionQuery};

/// Movie fields returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieResponse {
    /// Movie ID.
    pub id: Uuid,
    /// Title.
    pub title: String,
    /// Minimum viewer age.
    pub age_restriction: i32,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last update instant.
    pub updated_at: DateTime<Utc>,
}

impl From<movies::Model> for MovieResponse {
    fn from(model: movies::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            age_restriction: model.age_restriction,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

/// Session fields returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieSessionResponse {
    /// Session ID.
    pub id: Uuid,
    /// Owning movie.
    pub movie_id: Uuid,
    /// Exhibition date.
    pub date: DateTime<Utc>,
    /// Exhibition window.
    pub timeslot: String,
    /// Room number.
    pub room_number: i32,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last update instant.
    pub updated_at: DateTime<Utc>,
}

impl From<movie_sessions::Model> for MovieSessionResponse {
    fn from(model: movie_sessions::Model) -> Self {
        Self {
            id: model.id,
            movie_id: model.movie_id,
            date: model.date.with_timezone(&Utc),
            timeslot: model.timeslot,
            room_number: model.room_number,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

/// Movie detail including all of its sessions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieWithSessionsResponse {
    /// The movie fields.
    #[serde(flatten)]
    pub movie: MovieResponse,
    /// Every session scheduled for this movie.
    pub sessions: Vec<MovieSessionResponse>,
}

/// Request payload for creating a movie.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovieInput {
    /// Unique title.
    pub title: String,
    /// Minimum viewer age (0-21 inclusive).
    pub age_restriction: i32,
}

/// Request payload for creating movies in bulk.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkCreateMoviesInput {
    /// The movies to create, all-or-nothing.
    pub movies: Vec<CreateMovieInput>,
}

/// Request payload for a partial movie update.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMovieInput {
    /// New title, if changing.
    pub title: Option<String>,
    /// New age restriction, if changing.
    pub age_restriction: Option<i32>,
}

/// Request payload for deleting movies in bulk.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteMoviesInput {
    /// The movies to delete, all-or-nothing.
    pub movie_ids: Vec<Uuid>,
}

/// Request payload for scheduling a session.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionInput {
    /// Exhibition date (must be in the future).
    pub date: DateTime<Utc>,
    /// Exhibition window, e.g. `"18:00-20:00"`.
    pub timeslot: String,
    /// Room number (positive).
    pub room_number: i32,
}

/// Request payload for scheduling sessions in bulk.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkCreateSessionsInput {
    /// The sessions to schedule, all-or-nothing.
    pub sessions: Vec<CreateSessionInput>,
}

/// Request payload for deleting sessions in bulk.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteSessionsInput {
    /// The sessions to delete, all-or-nothing.
    pub session_ids: Vec<Uuid>,
}

/// Movie catalog and session scheduling service.
#[derive(Debug, Clone)]
pub struct MovieService {
    db: DatabaseConnection,
    cache: ResponseCache,
}

impl MovieService {
    /// Creates a new movie service.
    #[must_use]
    pub const fn new(db: DatabaseConnection, cache: ResponseCache) -> Self {
        Self { db, cache }
    }

    /// Lists movies, populating the response cache when a key is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_movies(
        &self,
        query: &MovieQuery,
        cache_key: Option<&str>,
    ) -> AppResult<PageResponse<MovieResponse>> {
        let (rows, total) = MovieRepository::find_all(&self.db, query)
            .await
            .map_err(db_err)?;

        let data = rows.into_iter().map(MovieResponse::from).collect();
        let response = PageResponse::new(data, query.page, query.per_page, total);
        self.cache_response(cache_key, &response);
        Ok(response)
    }

    /// Returns one movie with all its sessions.
    ///
    /// # Errors
    ///
    /// `NotFound` when the movie does not exist.
    pub async fn get_movie_by_id(&self, movie_id: Uuid) -> AppResult<MovieWithSessionsResponse> {
        let movie = MovieRepository::find_by_id(&self.db, movie_id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))?;

        let (sessions, _) =
            MovieSessionRepository::find_by_movie(&self.db, movie_id, &SessionQuery::unbounded())
                .await
                .map_err(db_err)?;

        Ok(MovieWithSessionsResponse {
            movie: movie.into(),
            sessions: sessions.into_iter().map(MovieSessionResponse::from).collect(),
        })
    }

    /// Creates a movie.
    ///
    /// # Errors
    ///
    /// `Validation` for a bad title or age restriction, `Conflict` when
    /// the title is taken.
    pub async fn create_movie(&self, input: CreateMovieInput) -> AppResult<MovieResponse> {
        let movie = Movie::new(&input.title, input.age_restriction)?;

        let txn = self.db.begin().await.map_err(db_err)?;
        let model = self.insert_movie(&txn, &movie).await?;
        txn.commit().await.map_err(db_err)?;

        self.cache.invalidate_all();
        info!(movie_id = %model.id, title = %model.title, "Movie created");
        Ok(model.into())
    }

    /// Creates movies in bulk: sequential inside one transaction, the
    /// first failure rolls back the whole batch.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create_movie`], for the first offending item.
    pub async fn create_bulk_movies(
        &self,
        inputs: Vec<CreateMovieInput>,
    ) -> AppResult<Vec<MovieResponse>> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let mut created = Vec::with_capacity(inputs.len());
        for input in inputs {
            let movie = Movie::new(&input.title, input.age_restriction)?;
            let model = self.insert_movie(&txn, &movie).await?;
            created.push(MovieResponse::from(model));
        }

        txn.commit().await.map_err(db_err)?;

        self.cache.invalidate_all();
        info!(count = created.len(), "Movies created in bulk");
        Ok(created)
    }

    /// Applies a partial update to a movie, re-running the invariant
    /// checks on the merged result. ID and creation instant are immutable.
    ///
    /// # Errors
    ///
    /// `NotFound` when the movie does not exist, `Validation` for a bad
    /// merged state.
    pub async fn update_movie(
        &self,
        movie_id: Uuid,
        input: UpdateMovieInput,
    ) -> AppResult<MovieResponse> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let existing = MovieRepository::find_by_id(&txn, movie_id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))?;

        let movie = Movie::with_id(
            existing.id,
            input.title.as_deref().unwrap_or(&existing.title),
            input.age_restriction.unwrap_or(existing.age_restriction),
            existing.created_at.with_timezone(&Utc),
        )?;

        let model = MovieRepository::update(&txn, &movie)
            .await
            .map_err(|e| insert_err(e, "Movie already exists"))?;

        txn.commit().await.map_err(db_err)?;

        self.cache.invalidate_all();
        info!(movie_id = %movie_id, "Movie updated");
        Ok(model.into())
    }

    /// Deletes a movie; its sessions cascade away.
    ///
    /// # Errors
    ///
    /// `NotFound` when the movie does not exist.
    pub async fn delete_movie(&self, movie_id: Uuid) -> AppResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;
        self.delete_movie_in(&txn, movie_id, "Movie not found").await?;
        txn.commit().await.map_err(db_err)?;

        self.cache.invalidate_all();
        info!(movie_id = %movie_id, "Movie deleted");
        Ok(())
    }

    /// Deletes movies in bulk, all-or-nothing.
    ///
    /// # Errors
    ///
    /// `NotFound` for the first missing movie.
    pub async fn delete_bulk_movies(&self, movie_ids: Vec<Uuid>) -> AppResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;

        for movie_id in &movie_ids {
            self.delete_movie_in(&txn, *movie_id, &format!("Movie with ID {movie_id} not found"))
                .await?;
        }

        txn.commit().await.map_err(db_err)?;

        self.cache.invalidate_all();
        info!(count = movie_ids.len(), "Movies deleted in bulk");
        Ok(())
    }

    /// Lists the sessions of one movie.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_sessions(
        &self,
        movie_id: Uuid,
        query: &SessionQuery,
        cache_key: Option<&str>,
    ) -> AppResult<PageResponse<MovieSessionResponse>> {
        let (rows, total) = MovieSessionRepository::find_by_movie(&self.db, movie_id, query)
            .await
            .map_err(db_err)?;

        let data = rows.into_iter().map(MovieSessionResponse::from).collect();
        let response = PageResponse::new(data, query.page, query.per_page, total);
        self.cache_response(cache_key, &response);
        Ok(response)
    }

    /// Returns one session, verifying it belongs to the requested movie.
    ///
    /// # Errors
    ///
    /// `NotFound` when the session does not exist, `Conflict` when it
    /// belongs to a different movie.
    pub async fn get_movie_session_by_id(
        &self,
        movie_id: Uuid,
        session_id: Uuid,
    ) -> AppResult<MovieSessionResponse> {
        let session = MovieSessionRepository::find_by_id(&self.db, session_id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| AppError::NotFound("Movie session not found".to_string()))?;

        if session.movie_id != movie_id {
            return Err(AppError::Conflict(
                "Movie session does not belong to the movie".to_string(),
            ));
        }

        Ok(session.into())
    }

    /// Schedules a session for a movie after the room-availability check.
    ///
    /// # Errors
    ///
    /// `NotFound` when the movie does not exist, `Validation` for entity
    /// invariant breaches, `Conflict` when the room is booked.
    pub async fn create_session(
        &self,
        movie_id: Uuid,
        input: CreateSessionInput,
    ) -> AppResult<MovieSessionResponse> {
        let txn = self.db.begin().await.map_err(db_err)?;

        if MovieRepository::find_by_id(&txn, movie_id)
            .await
            .map_err(db_err)?
            .is_none()
        {
            return Err(AppError::NotFound("Movie not found".to_string()));
        }

        let model = self.insert_session(&txn, movie_id, input).await?;

        txn.commit().await.map_err(db_err)?;

        self.cache.invalidate_all();
        info!(session_id = %model.id, movie_id = %movie_id, "Movie session created");
        Ok(model.into())
    }

    /// Schedules sessions in bulk, all-or-nothing.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create_session`], for the first offending item.
    pub async fn create_bulk_sessions(
        &self,
        movie_id: Uuid,
        inputs: Vec<CreateSessionInput>,
    ) -> AppResult<Vec<MovieSessionResponse>> {
        let txn = self.db.begin().await.map_err(db_err)?;

        if MovieRepository::find_by_id(&txn, movie_id)
            .await
            .map_err(db_err)?
            .is_none()
        {
            return Err(AppError::NotFound("Movie not found".to_string()));
        }

        let mut created = Vec::with_capacity(inputs.len());
        for input in inputs {
            let model = self.insert_session(&txn, movie_id, input).await?;
            created.push(MovieSessionResponse::from(model));
        }

        txn.commit().await.map_err(db_err)?;

        self.cache.invalidate_all();
        info!(movie_id = %movie_id, count = created.len(), "Movie sessions created in bulk");
        Ok(created)
    }

    /// Lists all sessions across movies.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_all_sessions(
        &self,
        query: &SessionQuery,
        cache_key: Option<&str>,
    ) -> AppResult<PageResponse<MovieSessionResponse>> {
        let (rows, total) = MovieSessionRepository::find_all(&self.db, query)
            .await
            .map_err(db_err)?;

        let data = rows.into_iter().map(MovieSessionResponse::from).collect();
        let response = PageResponse::new(data, query.page, query.per_page, total);
        self.cache_response(cache_key, &response);
        Ok(response)
    }

    /// Deletes a session; its tickets are detached, not deleted.
    ///
    /// # Errors
    ///
    /// `NotFound` when the session does not exist.
    pub async fn delete_session(&self, session_id: Uuid) -> AppResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;
        self.delete_session_in(&txn, session_id, "Movie session not found")
            .await?;
        txn.commit().await.map_err(db_err)?;

        self.cache.invalidate_all();
        info!(session_id = %session_id, "Movie session deleted");
        Ok(())
    }

    /// Deletes sessions in bulk, all-or-nothing.
    ///
    /// # Errors
    ///
    /// `NotFound` for the first missing session.
    pub async fn delete_bulk_sessions(&self, session_ids: Vec<Uuid>) -> AppResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;

        for session_id in &session_ids {
            self.delete_session_in(
                &txn,
                *session_id,
                &format!("Movie session with ID {session_id} not found"),
            )
            .await?;
        }

        txn.commit().await.map_err(db_err)?;

        self.cache.invalidate_all();
        info!(count = session_ids.len(), "Movie sessions deleted in bulk");
        Ok(())
    }

    async fn insert_movie(
        &self,
        txn: &DatabaseTransaction,
        movie: &Movie,
    ) -> AppResult<movies::Model> {
        if MovieRepository::find_by_title(txn, &movie.title)
            .await
            .map_err(db_err)?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Movie with title \"{}\" already exists",
                movie.title
            )));
        }

        MovieRepository::insert(txn, movie).await.map_err(|e| {
            insert_err(
                e,
                &format!("Movie with title \"{}\" already exists", movie.title),
            )
        })
    }

    async fn insert_session(
        &self,
        txn: &DatabaseTransaction,
        movie_id: Uuid,
        input: CreateSessionInput,
    ) -> AppResult<movie_sessions::Model> {
        let session = MovieSession::new(movie_id, input.date, &input.timeslot, input.room_number)?;

        let available = MovieSessionRepository::is_room_available(
            txn,
            session.date,
            session.timeslot.as_str(),
            session.room_number,
        )
        .await
        .map_err(db_err)?;

        let conflict = format!(
            "Room {} is already booked for {} {}",
            session.room_number, session.date, session.timeslot
        );
        if !available {
            return Err(AppError::Conflict(conflict));
        }

        MovieSessionRepository::insert(txn, &session)
            .await
            .map_err(|e| insert_err(e, &conflict))
    }

    async fn delete_movie_in(
        &self,
        txn: &DatabaseTransaction,
        movie_id: Uuid,
        missing: &str,
    ) -> AppResult<()> {
        if MovieRepository::find_by_id(txn, movie_id)
            .await
            .map_err(db_err)?
            .is_none()
        {
            return Err(AppError::NotFound(missing.to_string()));
        }

        MovieRepository::delete(txn, movie_id).await.map_err(db_err)
    }

    async fn delete_session_in(
        &self,
        txn: &DatabaseTransaction,
        session_id: Uuid,
        missing: &str,
    ) -> AppResult<()> {
        if MovieSessionRepository::find_by_id(txn, session_id)
            .await
            .map_err(db_err)?
            .is_none()
        {
            return Err(AppError::NotFound(missing.to_string()));
        }

        MovieSessionRepository::delete(txn, session_id)
            .await
            .map_err(db_err)
    }

    fn cache_response<T: serde::Serialize>(&self, cache_key: Option<&str>, response: &T) {
        if let Some(key) = cache_key {
            if let Ok(value) = serde_json::to_value(response) {
                self.cache.insert(key.to_string(), value);
            }
        }
    }
}
