//! Auth service: registration, login, token refresh, full-account logout.
//!
//! Register and login share one issuance flow: create a user session,
//! persist a refresh token bound to it, and sign a short-lived access
//! token embedding `{sub, role, sid}`. Login and refresh collapse their
//! distinct failure causes into a single Unauthorized so the response
//! never reveals which check failed.

use chrono::{Duration, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use tracing::{error, info};

use cinebook_core::auth::{
    RefreshToken, SESSION_TTL_DAYS, Token, UserSession, hash_password, verify_password,
};
use cinebook_core::user::{User, UserRole};
use cinebook_shared::auth::{AuthResponse, LoginRequest, RegisterRequest, UserInfo};
use cinebook_shared::{AppError, AppResult, JwtService};

use super::user::UserService;
use super::db_err;
use crate::entities::users;
use crate::repositories::{RefreshTokenRepository, UserSessionRepository};

/// Authentication and session lifecycle service.
#[derive(Debug, Clone)]
pub struct AuthService {
    db: DatabaseConnection,
    jwt: JwtService,
    users: UserService,
}

impl AuthService {
    /// Creates a new auth service.
    #[must_use]
    pub fn new(db: DatabaseConnection, jwt: JwtService) -> Self {
        let users = UserService::new(db.clone());
        Self { db, jwt, users }
    }

    /// Registers a new user and issues tokens.
    ///
    /// One transaction covers the user row, the session, and the stored
    /// refresh token; any failure rolls all three back.
    ///
    /// # Errors
    ///
    /// `Validation` for a weak password or bad role/age, `Conflict` when
    /// the username is taken.
    pub async fn register(&self, req: RegisterRequest) -> AppResult<AuthResponse> {
        let role: UserRole = req.role.parse::<UserRole>().map_err(AppError::from)?;
        let hashed = hash_password(&req.password)?;
        let user = User::new(&req.username, hashed, role, req.age)?;

        let txn = self.db.begin().await.map_err(db_err)?;

        let user = self.users.create_user(&txn, user).await?;
        let response = self.issue_tokens(&txn, &user).await?;

        txn.commit().await.map_err(db_err)?;

        info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(response)
    }

    /// Authenticates a user and issues tokens.
    ///
    /// # Errors
    ///
    /// `Unauthorized("Invalid credentials")` for any credential failure;
    /// `Internal("Login failed")` for everything else. Which check failed
    /// is deliberately not revealed.
    pub async fn login(&self, req: LoginRequest) -> AppResult<AuthResponse> {
        match self.login_inner(req).await {
            Ok(response) => Ok(response),
            Err(AppError::Unauthorized(_) | AppError::Validation(_)) => {
                Err(AppError::Unauthorized("Invalid credentials".to_string()))
            }
            Err(err) => {
                error!(error = %err, "Login failed");
                Err(AppError::Internal("Login failed".to_string()))
            }
        }
    }

    async fn login_inner(&self, req: LoginRequest) -> AppResult<AuthResponse> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let user = self
            .users
            .find_by_username(&txn, &req.username)
            .await?
            .ok_or_else(|| AppError::Unauthorized(format!("User {} not found", req.username)))?;

        if !verify_password(&req.password, &user.hashed_password)? {
            return Err(AppError::Unauthorized(format!(
                "Invalid password for user {}",
                req.username
            )));
        }

        let response = self.issue_tokens(&txn, &user).await?;

        txn.commit().await.map_err(db_err)?;

        info!(user_id = %user.id, "User logged in");
        Ok(response)
    }

    /// Exchanges a stored, live refresh token for a new access token.
    /// The refresh token itself is returned unchanged.
    ///
    /// # Errors
    ///
    /// `Unauthorized("Invalid refresh token")` for a malformed, unknown,
    /// revoked, or expired token, or a vanished user.
    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<AuthResponse> {
        match self.refresh_inner(refresh_token).await {
            Ok(response) => Ok(response),
            Err(AppError::Unauthorized(_) | AppError::Validation(_)) => {
                Err(AppError::Unauthorized("Invalid refresh token".to_string()))
            }
            Err(err) => Err(err),
        }
    }

    async fn refresh_inner(&self, refresh_token: &str) -> AppResult<AuthResponse> {
        let token = Token::parse(refresh_token)?;

        let stored = RefreshTokenRepository::find_by_token(&self.db, token.as_str())
            .await
            .map_err(db_err)?
            .ok_or_else(|| AppError::Unauthorized("Invalid refresh token".to_string()))?;

        if stored.is_revoked || stored.expires_at.with_timezone(&Utc) < Utc::now() {
            return Err(AppError::Unauthorized("Invalid refresh token".to_string()));
        }

        let user = self
            .users
            .find_by_id(&self.db, stored.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

        let access_token = self
            .jwt
            .generate_access_token(user.id, user.role.as_str(), stored.session_id)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(AuthResponse {
            access_token,
            refresh_token: stored.token,
            expires_at: Utc::now() + Duration::seconds(self.jwt.access_token_expires_in()),
            user: user_info(&user),
        })
    }

    /// Logs the user out everywhere: verifies the presented access token,
    /// then revokes every non-revoked refresh token and session of that
    /// user in one transaction.
    ///
    /// # Errors
    ///
    /// `Unauthorized("Invalid token")` for a bad access token or an
    /// already-revoked session.
    pub async fn logout(&self, access_token: &str) -> AppResult<()> {
        match self.logout_inner(access_token).await {
            Ok(()) => Ok(()),
            Err(AppError::Unauthorized(_) | AppError::Validation(_)) => {
                Err(AppError::Unauthorized("Invalid token".to_string()))
            }
            Err(err) => Err(err),
        }
    }

    async fn logout_inner(&self, access_token: &str) -> AppResult<()> {
        let claims = self
            .jwt
            .validate_token(access_token)
            .map_err(|e| AppError::Unauthorized(e.to_string()))?;

        let txn = self.db.begin().await.map_err(db_err)?;

        let session = UserSessionRepository::find_by_id(&txn, claims.session_id())
            .await
            .map_err(db_err)?
            .ok_or_else(|| AppError::Unauthorized("Invalid session".to_string()))?;
        if session.is_revoked {
            return Err(AppError::Unauthorized("Invalid session".to_string()));
        }

        let tokens_revoked =
            RefreshTokenRepository::revoke_all_for_user(&txn, claims.user_id())
                .await
                .map_err(db_err)?;
        let sessions_revoked =
            UserSessionRepository::revoke_all_for_user(&txn, claims.user_id())
                .await
                .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        info!(
            user_id = %claims.user_id(),
            tokens_revoked,
            sessions_revoked,
            "User logged out everywhere"
        );
        Ok(())
    }

    /// Creates a session, persists a refresh token bound to it, and signs
    /// an access token, all on the caller's transaction.
    async fn issue_tokens(
        &self,
        conn: &impl ConnectionTrait,
        user: &users::Model,
    ) -> AppResult<AuthResponse> {
        let session = UserSession::new(user.id, Utc::now() + Duration::days(SESSION_TTL_DAYS));
        UserSessionRepository::insert(conn, &session)
            .await
            .map_err(db_err)?;

        let refresh_string = self
            .jwt
            .generate_refresh_token(user.id)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let refresh = RefreshToken::new(
            Token::parse(&refresh_string)?,
            user.id,
            session.id,
            session.expires_at,
        );
        RefreshTokenRepository::insert(conn, &refresh)
            .await
            .map_err(db_err)?;

        let access_token = self
            .jwt
            .generate_access_token(user.id, user.role.as_str(), session.id)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(AuthResponse {
            access_token,
            refresh_token: refresh.token.into_inner(),
            expires_at: Utc::now() + Duration::seconds(self.jwt.access_token_expires_in()),
            user: user_info(user),
        })
    }
}

fn user_info(user: &users::Model) -> UserInfo {
    UserInfo {
        id: user.id,
        username: user.username.clone(),
        role: user.role.as_str().to_string(),
        age: user.age,
    }
}
