//! `SeaORM` active enums backed by Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User role, stored as the Postgres `user_role` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Back-office operator.
    #[sea_orm(string_value = "manager")]
    Manager,
    /// Regular moviegoer.
    #[sea_orm(string_value = "customer")]
    Customer,
}

impl From<cinebook_core::user::UserRole> for UserRole {
    fn from(role: cinebook_core::user::UserRole) -> Self {
        match role {
            cinebook_core::user::UserRole::Manager => Self::Manager,
            cinebook_core::user::UserRole::Customer => Self::Customer,
        }
    }
}

impl From<UserRole> for cinebook_core::user::UserRole {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Manager => Self::Manager,
            UserRole::Customer => Self::Customer,
        }
    }
}

impl UserRole {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Customer => "customer",
        }
    }
}
