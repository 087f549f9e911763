//! `SeaORM` Entity for movies table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub title: String,
    pub age_restriction: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movie_sessions::Entity")]
    MovieSessions,
}

impl Related<super::movie_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieSessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
