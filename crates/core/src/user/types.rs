//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::UserError;

/// User role, fixed at account creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Back-office operator: full catalog and ticket administration.
    Manager,
    /// Regular moviegoer.
    Customer,
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

    /// Returns true for the manager role.
    #[must_use]
    pub const fn is_manager(&self) -> bool {
        matches!(self, Self::Manager)
    }
}

impl std::str::FromStr for UserRole {
    type Err = UserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manager" => Ok(Self::Manager),
            "customer" => Ok(Self::Customer),
            other => Err(UserError::InvalidRole(other.to_string())),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user account.
#[derive(Debug, Clone)]
pub struct User {
    /// User ID.
    pub id: Uuid,
    /// Unique username.
    pub username: String,
    /// Argon2id password hash.
    pub hashed_password: String,
    /// Account role.
    pub role: UserRole,
    /// Age (non-negative).
    pub age: i32,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last update instant.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user, validating its invariants.
    ///
    /// # Errors
    ///
    /// Returns `UserError::EmptyUsername` or `UserError::NegativeAge`.
    pub fn new(
        username: &str,
        hashed_password: String,
        role: UserRole,
        age: i32,
    ) -> Result<Self, UserError> {
        if username.trim().is_empty() {
            return Err(UserError::EmptyUsername);
        }
        if age < 0 {
            return Err(UserError::NegativeAge(age));
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            username: username.to_string(),
            hashed_password,
            role,
            age,
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("manager", UserRole::Manager)]
    #[case("customer", UserRole::Customer)]
    fn test_role_parse(#[case] raw: &str, #[case] role: UserRole) {
        assert_eq!(raw.parse::<UserRole>().unwrap(), role);
        assert_eq!(role.to_string(), raw);
    }

    #[test]
    fn test_role_parse_rejects_unknown() {
        assert_eq!(
            "admin".parse::<UserRole>(),
            Err(UserError::InvalidRole("admin".to_string()))
        );
    }

    #[test]
    fn test_is_manager() {
        assert!(UserRole::Manager.is_manager());
        assert!(!UserRole::Customer.is_manager());
    }

    #[test]
    fn test_create_valid_user() {
        let user = User::new("alice", "$argon2id$hash".to_string(), UserRole::Customer, 30).unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.role, UserRole::Customer);
    }

    #[test]
    fn test_empty_username_rejected() {
        let result = User::new("  ", "hash".to_string(), UserRole::Customer, 30);
        assert_eq!(result.unwrap_err(), UserError::EmptyUsername);
    }

    #[test]
    fn test_negative_age_rejected() {
        let result = User::new("bob", "hash".to_string(), UserRole::Customer, -1);
        assert_eq!(result.unwrap_err(), UserError::NegativeAge(-1));
    }
}
