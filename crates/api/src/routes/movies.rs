//! Movie catalog routes, including the nested session sub-resource.

use axum::{
    Json, Router,
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::{AuthUser, ManagerUser};
use cinebook_db::repositories::{MovieQuery, SessionQuery};
use cinebook_db::services::{
    BulkCreateMoviesInput, BulkCreateSessionsInput, BulkDeleteMoviesInput, CreateMovieInput,
    CreateSessionInput, MovieService, UpdateMovieInput,
};

/// Creates the movies router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/movies", get(list_movies).post(create_movie))
        .route(
            "/movies/bulk",
            post(create_bulk_movies).delete(delete_bulk_movies),
        )
        .route(
            "/movies/{movie_id}",
            get(get_movie).patch(update_movie).delete(delete_movie),
        )
        .route(
            "/movies/{movie_id}/sessions",
            get(list_movie_sessions).post(create_session),
        )
        .route("/movies/{movie_id}/sessions/bulk", post(create_bulk_sessions))
        .route(
            "/movies/{movie_id}/sessions/{session_id}",
            get(get_movie_session),
        )
}

pub(crate) fn movie_service(state: &AppState) -> MovieService {
    MovieService::new((*state.db).clone(), state.cache.clone())
}

/// GET /movies - List movies (paginated, cached by request URI).
async fn list_movies(
    State(state): State<AppState>,
    _auth: AuthUser,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<MovieQuery>,
) -> Result<Response, ApiError> {
    let key = uri.to_string();
    if let Some(cached) = state.cache.get(&key) {
        return Ok(Json((*cached).clone()).into_response());
    }

    let page = movie_service(&state).get_movies(&query, Some(&key)).await?;
    Ok(Json(page).into_response())
}

/// GET /movies/{movie_id} - One movie with all its sessions.
async fn get_movie(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(movie_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let movie = movie_service(&state).get_movie_by_id(movie_id).await?;
    Ok(Json(movie))
}

/// POST /movies - Create a movie. Requires manager role.
async fn create_movie(
    State(state): State<AppState>,
    _auth: ManagerUser,
    Json(payload): Json<CreateMovieInput>,
) -> Result<impl IntoResponse, ApiError> {
    let movie = movie_service(&state).create_movie(payload).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

/// POST /movies/bulk - Create movies all-or-nothing. Requires manager role.
async fn create_bulk_movies(
    State(state): State<AppState>,
    _auth: ManagerUser,
    Json(payload): Json<BulkCreateMoviesInput>,
) -> Result<impl IntoResponse, ApiError> {
    let movies = movie_service(&state)
        .create_bulk_movies(payload.movies)
        .await?;
    Ok((StatusCode::CREATED, Json(movies)))
}

/// PATCH /movies/{movie_id} - Partially update a movie. Requires manager role.
async fn update_movie(
    State(state): State<AppState>,
    _auth: ManagerUser,
    Path(movie_id): Path<Uuid>,
    Json(payload): Json<UpdateMovieInput>,
) -> Result<impl IntoResponse, ApiError> {
    let movie = movie_service(&state).update_movie(movie_id, payload).await?;
    Ok(Json(movie))
}

/// DELETE /movies/{movie_id} - Delete a movie and its sessions. Requires manager role.
async fn delete_movie(
    State(state): State<AppState>,
    _auth: ManagerUser,
    Path(movie_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    movie_service(&state).delete_movie(movie_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /movies/bulk - Delete movies all-or-nothing. Requires manager role.
async fn delete_bulk_movies(
    State(state): State<AppState>,
    _auth: ManagerUser,
    Json(payload): Json<BulkDeleteMoviesInput>,
) -> Result<impl IntoResponse, ApiError> {
    movie_service(&state)
        .delete_bulk_movies(payload.movie_ids)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /movies/{movie_id}/sessions - Sessions of a movie (paginated, cached).
async fn list_movie_sessions(
    State(state): State<AppState>,
    _auth: AuthUser,
    OriginalUri(uri): OriginalUri,
    Path(movie_id): Path<Uuid>,
    Query(query): Query<SessionQuery>,
) -> Result<Response, ApiError> {
    let key = uri.to_string();
    if let Some(cached) = state.cache.get(&key) {
        return Ok(Json((*cached).clone()).into_response());
    }

    let page = movie_service(&state)
        .get_sessions(movie_id, &query, Some(&key))
        .await?;
    Ok(Json(page).into_response())
}

/// GET /movies/{movie_id}/sessions/{session_id} - One session of a movie.
async fn get_movie_session(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((movie_id, session_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let session = movie_service(&state)
        .get_movie_session_by_id(movie_id, session_id)
        .await?;
    Ok(Json(session))
}

/// POST /movies/{movie_id}/sessions - Schedule a session. Requires manager role.
async fn create_session(
    State(state): State<AppState>,
    _auth: ManagerUser,
    Path(movie_id): Path<Uuid>,
    Json(payload): Json<CreateSessionInput>,
) -> Result<impl IntoResponse, ApiError> {
    let session = movie_service(&state).create_session(movie_id, payload).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// POST /movies/{movie_id}/sessions/bulk - Schedule sessions all-or-nothing.
/// Requires manager role.
async fn create_bulk_sessions(
    State(state): State<AppState>,
    _auth: ManagerUser,
    Path(movie_id): Path<Uuid>,
    Json(payload): Json<BulkCreateSessionsInput>,
) -> Result<impl IntoResponse, ApiError> {
    let sessions = movie_service(&state)
        .create_bulk_sessions(movie_id, payload.sessions)
        .await?;
    Ok((StatusCode::CREATED, Json(sessions)))
}
