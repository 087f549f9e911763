//! Top-level movie session routes.

use axum::{
    Json, Router,
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
};
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::{AuthUser, ManagerUser};
use crate::routes::movies::movie_service;
use cinebook_db::repositories::SessionQuery;
use cinebook_db::services::BulkDeleteSessionsInput;

/// Creates the movie sessions router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/movie-sessions", get(list_sessions))
        .route("/movie-sessions/bulk", delete(delete_bulk_sessions))
        .route("/movie-sessions/{session_id}", delete(delete_session))
}

/// GET /movie-sessions - All sessions across movies (paginated, cached).
async fn list_sessions(
    State(state): State<AppState>,
    _auth: AuthUser,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<SessionQuery>,
) -> Result<Response, ApiError> {
    let key = uri.to_string();
    if let Some(cached) = state.cache.get(&key) {
        return Ok(Json((*cached).clone()).into_response());
    }

    let page = movie_service(&state)
        .get_all_sessions(&query, Some(&key))
        .await?;
    Ok(Json(page).into_response())
}

/// DELETE /movie-sessions/{session_id} - Delete a session. Requires manager role.
async fn delete_session(
    State(state): State<AppState>,
    _auth: ManagerUser,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    movie_service(&state).delete_session(session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /movie-sessions/bulk - Delete sessions all-or-nothing. Requires manager role.
async fn delete_bulk_sessions(
    State(state): State<AppState>,
    _auth: ManagerUser,
    Json(payload): Json<BulkDeleteSessionsInput>,
) -> Result<impl IntoResponse, ApiError> {
    movie_service(&state)
        .delete_bulk_sessions(payload.session_ids)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
