//! Ticket lifecycle routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::{AuthUser, ManagerUser};
use cinebook_db::TicketService;
use cinebook_db::services::{BuyTicketInput, UserTicketsQuery};
use cinebook_shared::AppError;

/// Creates the tickets router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tickets", get(list_tickets).post(buy_ticket))
        .route("/tickets/me", get(my_tickets))
        .route("/tickets/{ticket_id}/use", post(use_ticket))
        .route("/tickets/{ticket_id}", axum::routing::delete(delete_ticket))
}

fn ticket_service(state: &AppState) -> TicketService {
    TicketService::new((*state.db).clone())
}

/// GET /tickets - Every ticket in the system. Requires manager role.
async fn list_tickets(
    State(state): State<AppState>,
    _auth: ManagerUser,
) -> Result<impl IntoResponse, ApiError> {
    let tickets = ticket_service(&state).get_tickets().await?;
    Ok(Json(tickets))
}

/// POST /tickets - Buy a ticket. Customers may only buy for themselves.
async fn buy_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<BuyTicketInput>,
) -> Result<impl IntoResponse, ApiError> {
    if auth.user_id() != payload.user_id {
        return Err(AppError::Forbidden(
            "Users can only buy tickets for their own account".to_string(),
        )
        .into());
    }

    let ticket = ticket_service(&state)
        .buy_ticket(payload.user_id, payload.session_id)
        .await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// GET /tickets/me - The caller's tickets (all, used, or unused).
async fn my_tickets(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<UserTicketsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let tickets = ticket_service(&state)
        .get_user_tickets(auth.user_id(), query.filter_by_use)
        .await?;
    Ok(Json(tickets))
}

/// POST /tickets/{ticket_id}/use - Mark a ticket as used. Requires manager role.
async fn use_ticket(
    State(state): State<AppState>,
    _auth: ManagerUser,
    Path(ticket_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let ticket = ticket_service(&state).use_ticket(ticket_id).await?;
    Ok(Json(ticket))
}

/// DELETE /tickets/{ticket_id} - Cancel a ticket. Requires manager role.
async fn delete_ticket(
    State(state): State<AppState>,
    _auth: ManagerUser,
    Path(ticket_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    ticket_service(&state).delete_ticket(ticket_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
