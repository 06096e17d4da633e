//! Account entity representing a registered identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::role::{has_role, Role};
use crate::domain::value_objects::AccountSummary;

/// Account entity
///
/// `password_hash` never leaves the core; use [`Account::summary`] for
/// anything that is returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Numeric identifier assigned by the store
    pub id: i64,

    /// Unique, normalized (lower-case) email address
    pub email: String,

    /// Unique display handle
    pub nickname: String,

    /// bcrypt hash of the password
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Roles currently granted to the account
    pub roles: Vec<Role>,

    /// Timestamp when the account was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the account was last updated
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Checks whether the account currently holds `role`
    pub fn has_role(&self, role: Role) -> bool {
        has_role(&self.roles, role)
    }

    /// Public view of the account
    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            id: self.id,
            email: self.email.clone(),
            nickname: self.nickname.clone(),
            roles: self.roles.clone(),
            created_at: self.created_at,
        }
    }
}

/// Data needed to insert a new account; the store assigns the ID and
/// timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub email: String,
    pub nickname: String,
    pub password_hash: String,
}
