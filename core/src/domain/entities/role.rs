//! Closed set of role tags carried in accounts and token claims.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Role granted to an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Every registered account
    User,
    /// Content moderation rights
    Moderator,
    /// Operational rights such as signing key rotation
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }

    /// Parses stored role names, dropping (and logging) tags this build
    /// does not know about.
    pub fn parse_lossy<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<Role> {
        let mut roles: Vec<Role> = names
            .into_iter()
            .filter_map(|name| match name.parse() {
                Ok(role) => Some(role),
                Err(_) => {
                    tracing::warn!(role = name, "Ignoring unknown role");
                    None
                }
            })
            .collect();
        roles.sort();
        roles.dedup();
        roles
    }
}

/// Capability check behind every authorization decision
pub fn has_role(roles: &[Role], role: Role) -> bool {
    roles.contains(&role)
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "moderator" => Ok(Role::Moderator),
            "admin" => Ok(Role::Admin),
            other => Err(ValidationError::UnknownRole {
                role: other.to_string(),
            }),
        }
    }
}
