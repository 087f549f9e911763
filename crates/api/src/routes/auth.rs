//! Authentication routes for register, login, refresh, and logout.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::IntoResponse,
    routing::post,
};

use crate::error::ApiError;
use crate::middleware::auth::extract_bearer_token;
use crate::AppState;
use cinebook_db::AuthService;
use cinebook_shared::AppError;
use cinebook_shared::auth::{LoginRequest, RefreshRequest, RegisterRequest};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
}

fn auth_service(state: &AppState) -> AuthService {
    AuthService::new((*state.db).clone(), (*state.jwt_service).clone())
}

/// POST /auth/register - Create an account and issue tokens.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response = auth_service(&state).register(payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /auth/login - Authenticate and issue tokens.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response = auth_service(&state).login(payload).await?;
    Ok(Json(response))
}

/// POST /auth/refresh - Rotate the access token.
async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response = auth_service(&state)
        .refresh_token(&payload.refresh_token)
        .await?;
    Ok(Json(response))
}

/// POST /auth/logout - Revoke every session and refresh token of the user.
///
/// The access token is read from the Authorization header and verified by
/// the service itself, so this route stays outside the auth middleware.
async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_bearer_token)
        .ok_or_else(|| {
            AppError::Unauthorized("Authorization header with Bearer token is required".to_string())
        })?;

    auth_service(&state).logout(token).await?;
    Ok(StatusCode::NO_CONTENT)
}
