//! User service: thin orchestration over the user repository, composing
//! ticket history into the detail read.

use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use cinebook_core::ticket::TicketFilter;
use cinebook_core::user::User;
use cinebook_shared::{AppError, AppResult};

use super::ticket::{TicketResponse, TicketService};
use super::{db_err, insert_err};
use crate::entities::users;
use crate::repositories::UserRepository;

/// User fields returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Role.
    pub role: String,
    /// Age.
    pub age: i32,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last update instant.
    pub updated_at: DateTime<Utc>,
}

impl From<users::Model> for UserResponse {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            role: model.role.as_str().to_string(),
            age: model.age,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

/// User detail including the full ticket history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWithTicketsResponse {
    /// The user fields.
    #[serde(flatten)]
    pub user: UserResponse,
    /// All tickets the user holds or has used.
    pub tickets: Vec<TicketResponse>,
}

/// User account service.
#[derive(Debug, Clone)]
pub struct UserService {
    db: DatabaseConnection,
    tickets: TicketService,
}

impl UserService {
    /// Creates a new user service.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        let tickets = TicketService::new(db.clone());
        Self { db, tickets }
    }

    /// Lists all users.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_users(&self) -> AppResult<Vec<UserResponse>> {
        let rows = UserRepository::find_all(&self.db).await.map_err(db_err)?;
        Ok(rows.into_iter().map(UserResponse::from).collect())
    }

    /// Returns one user with their full ticket history.
    ///
    /// # Errors
    ///
    /// `NotFound` when the user does not exist.
    pub async fn get_user_by_id(&self, id: Uuid) -> AppResult<UserWithTicketsResponse> {
        let user = UserRepository::find_by_id(&self.db, id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let tickets = self.tickets.get_user_tickets(id, TicketFilter::All).await?;

        Ok(UserWithTicketsResponse {
            user: user.into(),
            tickets,
        })
    }

    /// Creates a user after checking username uniqueness on the same
    /// connection (the unique index backstops the check).
    ///
    /// # Errors
    ///
    /// `Conflict` when the username is taken.
    pub async fn create_user(
        &self,
        conn: &impl ConnectionTrait,
        user: User,
    ) -> AppResult<users::Model> {
        if UserRepository::find_by_username(conn, &user.username)
            .await
            .map_err(db_err)?
            .is_some()
        {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }

        let model = UserRepository::insert(conn, &user)
            .await
            .map_err(|e| insert_err(e, "Username already exists"))?;

        info!(user_id = %model.id, username = %model.username, "User created");
        Ok(model)
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        id: Uuid,
    ) -> AppResult<Option<users::Model>> {
        UserRepository::find_by_id(conn, id).await.map_err(db_err)
    }

    /// Finds a user by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_username(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
    ) -> AppResult<Option<users::Model>> {
        UserRepository::find_by_username(conn, username)
            .await
            .map_err(db_err)
    }

    /// Deletes a user; dependent tickets, sessions, and refresh tokens are
    /// removed by the database cascades.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        UserRepository::delete(&self.db, id).await.map_err(db_err)?;
        info!(user_id = %id, "User deleted");
        Ok(())
    }
}
