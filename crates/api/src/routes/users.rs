//! User read routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::{AuthUser, ManagerUser};
use cinebook_db::{TicketService, UserService};
use cinebook_db::services::UserTicketsQuery;
use cinebook_shared::AppError;

/// Creates the users router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/{user_id}", get(get_user))
        .route("/users/{user_id}/tickets", get(get_user_tickets))
}

/// GET /users - All users. Requires manager role.
async fn list_users(
    State(state): State<AppState>,
    _auth: ManagerUser,
) -> Result<impl IntoResponse, ApiError> {
    let users = UserService::new((*state.db).clone()).get_users().await?;
    Ok(Json(users))
}

/// GET /users/{user_id} - One user with ticket history. Self or manager.
async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if auth.user_id() != user_id && !auth.is_manager() {
        return Err(AppError::Forbidden("Access denied".to_string()).into());
    }

    let user = UserService::new((*state.db).clone())
        .get_user_by_id(user_id)
        .await?;
    Ok(Json(user))
}

/// GET /users/{user_id}/tickets - A user's tickets. Requires manager role.
async fn get_user_tickets(
    State(state): State<AppState>,
    _auth: ManagerUser,
    Path(user_id): Path<Uuid>,
    Query(query): Query<UserTicketsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let tickets = TicketService::new((*state.db).clone())
        .get_user_tickets(user_id, query.filter_by_use)
        .await?;
    Ok(Json(tickets))
}
