//! `SeaORM` Entity for tickets table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "tickets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    /// Nullable: deleting a session detaches its tickets instead of
    /// deleting the purchase history.
    pub session_id: Option<Uuid>,
    pub purchased_at: DateTimeWithTimeZone,
    pub is_used: bool,
    pub used_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::movie_sessions::Entity",
        from = "Column::SessionId",
        to = "super::movie_sessions::Column::Id"
    )]
    MovieSessions,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::movie_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieSessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
