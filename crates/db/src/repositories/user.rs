//! User repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use cinebook_core::user::User;

use crate::entities::users;

/// User repository for CRUD operations.
#[derive(Debug, Clone, Copy)]
pub struct UserRepository;

impl UserRepository {
    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        conn: &impl ConnectionTrait,
        id: Uuid,
    ) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(conn).await
    }

    /// Finds a user by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_username(
        conn: &impl ConnectionTrait,
        username: &str,
    ) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(conn)
            .await
    }

    /// Lists all users, oldest account first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_all(conn: &impl ConnectionTrait) -> Result<Vec<users::Model>, DbErr> {
        users::Entity::find()
            .order_by_asc(users::Column::CreatedAt)
            .all(conn)
            .await
    }

    /// Inserts a validated user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails (including a unique
    /// constraint violation on the username).
    pub async fn insert(conn: &impl ConnectionTrait, user: &User) -> Result<users::Model, DbErr> {
        users::ActiveModel {
            id: Set(user.id),
            username: Set(user.username.clone()),
            hashed_password: Set(user.hashed_password.clone()),
            role: Set(user.role.into()),
            age: Set(user.age),
            created_at: Set(user.created_at.into()),
            updated_at: Set(user.updated_at.into()),
        }
        .insert(conn)
        .await
    }

    /// Deletes a user by ID; tickets, sessions, and refresh tokens cascade
    /// at the database level.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(conn: &impl ConnectionTrait, id: Uuid) -> Result<(), DbErr> {
        users::Entity::delete_by_id(id).exec(conn).await?;
        Ok(())
    }
}
