//! Token claims and issued token pairs.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::{has_role, Role};
use crate::errors::TokenError;

/// Distinguishes access tokens from refresh tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Claims structure for the signed token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID as a decimal string)
    pub sub: String,

    /// Roles held by the subject when the token was minted
    pub roles: Vec<Role>,

    /// Expiration timestamp (epoch seconds)
    pub exp: i64,

    /// Issued at timestamp
    pub iat: i64,

    /// Issuer
    pub iss: String,

    /// Unique token ID
    pub jti: String,

    /// Access or refresh
    pub typ: TokenType,
}

impl Claims {
    /// Creates claims for `account_id` that expire `ttl` from now
    pub fn new(
        account_id: i64,
        roles: Vec<Role>,
        typ: TokenType,
        ttl: Duration,
        issuer: &str,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: account_id.to_string(),
            roles,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            iss: issuer.to_string(),
            jti: Uuid::new_v4().to_string(),
            typ,
        }
    }

    /// Account ID carried in `sub`
    pub fn account_id(&self) -> Result<i64, TokenError> {
        self.sub.parse().map_err(|_| TokenError::Malformed)
    }

    /// Capability check used by every authorization decision
    pub fn has_role(&self, role: Role) -> bool {
        has_role(&self.roles, role)
    }
}

/// Access and refresh token minted together for one authentication event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedTokens {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token expiry (epoch seconds)
    pub access_expires_at: i64,
    /// Refresh token expiry (epoch seconds); sessions expire at the same instant
    pub refresh_expires_at: i64,
}
