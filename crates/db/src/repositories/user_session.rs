//! User session repository for database operations.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use cinebook_core::auth::UserSession;

use crate::entities::user_sessions;

/// User session repository for CRUD operations.
#[derive(Debug, Clone, Copy)]
pub struct UserSessionRepository;

impl UserSessionRepository {
    /// Inserts a new session.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn insert(
        conn: &impl ConnectionTrait,
        session: &UserSession,
    ) -> Result<user_sessions::Model, DbErr> {
        user_sessions::ActiveModel {
            id: Set(session.id),
            user_id: Set(session.user_id),
            created_at: Set(session.created_at.into()),
            expires_at: Set(session.expires_at.into()),
            is_revoked: Set(session.is_revoked),
            revoked_at: Set(session.revoked_at.map(Into::into)),
        }
        .insert(conn)
        .await
    }

    /// Finds a session by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        conn: &impl ConnectionTrait,
        id: Uuid,
    ) -> Result<Option<user_sessions::Model>, DbErr> {
        user_sessions::Entity::find_by_id(id).one(conn).await
    }

    /// Revokes all non-revoked sessions of a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn revoke_all_for_user(
        conn: &impl ConnectionTrait,
        user_id: Uuid,
    ) -> Result<u64, DbErr> {
        let now = chrono::Utc::now();

        let result = user_sessions::Entity::update_many()
            .col_expr(user_sessions::Column::IsRevoked, Expr::value(true))
            .col_expr(user_sessions::Column::RevokedAt, Expr::value(now))
            .filter(user_sessions::Column::UserId.eq(user_id))
            .filter(user_sessions::Column::IsRevoked.eq(false))
            .exec(conn)
            .await?;

        Ok(result.rows_affected)
    }
}
