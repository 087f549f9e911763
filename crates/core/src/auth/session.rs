//! Server-side auth session entities.
//!
//! A `UserSession` groups the refresh tokens issued in one login/register
//! flow; both carry revocation state so logout can invalidate them
//! without waiting for expiry.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::token::Token;

/// Lifetime of a user session and its refresh tokens, in days.
pub const SESSION_TTL_DAYS: i64 = 7;

/// A stored refresh token bound to a user session.
#[derive(Debug, Clone)]
pub struct RefreshToken {
    /// Token ID.
    pub id: Uuid,
    /// The token string itself.
    pub token: Token,
    /// Owning user.
    pub user_id: Uuid,
    /// Session the token was issued under.
    pub session_id: Uuid,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
    /// Whether the token has been revoked.
    pub is_revoked: bool,
    /// When the token was revoked, if ever.
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    /// Creates a new, unrevoked refresh token record.
    #[must_use]
    pub fn new(token: Token, user_id: Uuid, session_id: Uuid, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            token,
            user_id,
            session_id,
            created_at: Utc::now(),
            expires_at,
            is_revoked: false,
            revoked_at: None,
        }
    }

    /// Marks the token as revoked.
    pub fn revoke(&mut self) {
        self.is_revoked = true;
        self.revoked_at = Some(Utc::now());
    }

    /// Returns true if the token is neither revoked nor expired.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.is_revoked && Utc::now() < self.expires_at
    }
}

/// A server-side login session.
#[derive(Debug, Clone)]
pub struct UserSession {
    /// Session ID.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
    /// Whether the session has been revoked.
    pub is_revoked: bool,
    /// When the session was revoked, if ever.
    pub revoked_at: Option<DateTime<Utc>>,
}

impl UserSession {
    /// Creates a new, unrevoked session.
    #[must_use]
    pub fn new(user_id: Uuid, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            created_at: Utc::now(),
            expires_at,
            is_revoked: false,
            revoked_at: None,
        }
    }

    /// Marks the session as revoked.
    pub fn revoke(&mut self) {
        self.is_revoked = true;
        self.revoked_at = Some(Utc::now());
    }

    /// Returns true if the session is neither revoked nor expired.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.is_revoked && Utc::now() < self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn future() -> DateTime<Utc> {
        Utc::now() + Duration::days(SESSION_TTL_DAYS)
    }

    #[test]
    fn test_new_session_is_active() {
        let session = UserSession::new(Uuid::new_v4(), future());
        assert!(session.is_active());
        assert!(!session.is_revoked);
        assert!(session.revoked_at.is_none());
    }

    #[test]
    fn test_revoked_session_is_not_active() {
        let mut session = UserSession::new(Uuid::new_v4(), future());
        session.revoke();
        assert!(!session.is_active());
        assert!(session.revoked_at.is_some());
    }

    #[test]
    fn test_expired_session_is_not_active() {
        let session = UserSession::new(Uuid::new_v4(), Utc::now() - Duration::seconds(1));
        assert!(!session.is_active());
    }

    #[test]
    fn test_refresh_token_validity() {
        let token = Token::parse("a.b.c").unwrap();
        let mut refresh = RefreshToken::new(token, Uuid::new_v4(), Uuid::new_v4(), future());
        assert!(refresh.is_valid());

        refresh.revoke();
        assert!(!refresh.is_valid());
    }

    #[test]
    fn test_expired_refresh_token_is_invalid() {
        let token = Token::parse("a.b.c").unwrap();
        let refresh = RefreshToken::new(
            token,
            Uuid::new_v4(),
            Uuid::new_v4(),
            Utc::now() - Duration::seconds(1),
        );
        assert!(!refresh.is_valid());
    }
}
