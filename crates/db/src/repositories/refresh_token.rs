//! Refresh token repository for database operations.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use cinebook_core::auth::RefreshToken;

use crate::entities::refresh_tokens;

/// Refresh token repository for CRUD operations.
#[derive(Debug, Clone, Copy)]
pub struct RefreshTokenRepository;

impl RefreshTokenRepository {
    /// Inserts a new refresh token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn insert(
        conn: &impl ConnectionTrait,
        token: &RefreshToken,
    ) -> Result<refresh_tokens::Model, DbErr> {
        refresh_tokens::ActiveModel {
            id: Set(token.id),
            token: Set(token.token.as_str().to_string()),
            user_id: Set(token.user_id),
            session_id: Set(token.session_id),
            created_at: Set(token.created_at.into()),
            expires_at: Set(token.expires_at.into()),
            is_revoked: Set(token.is_revoked),
            revoked_at: Set(token.revoked_at.map(Into::into)),
        }
        .insert(conn)
        .await
    }

    /// Finds a stored refresh token by its exact value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_token(
        conn: &impl ConnectionTrait,
        token: &str,
    ) -> Result<Option<refresh_tokens::Model>, DbErr> {
        refresh_tokens::Entity::find()
            .filter(refresh_tokens::Column::Token.eq(token))
            .one(conn)
            .await
    }

    /// Revokes all non-revoked refresh tokens of a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn revoke_all_for_user(
        conn: &impl ConnectionTrait,
        user_id: Uuid,
    ) -> Result<u64, DbErr> {
        let now = chrono::Utc::now();

        let result = refresh_tokens::Entity::update_many()
            .col_expr(refresh_tokens::Column::IsRevoked, Expr::value(true))
            .col_expr(refresh_tokens::Column::RevokedAt, Expr::value(now))
            .filter(refresh_tokens::Column::UserId.eq(user_id))
            .filter(refresh_tokens::Column::IsRevoked.eq(false))
            .exec(conn)
            .await?;

        Ok(result.rows_affected)
    }
}
