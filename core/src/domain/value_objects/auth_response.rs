//! Authentication response value objects for API responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{has_role, IssuedTokens, Role};

/// Public view of an account, safe to return to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountSummary {
    pub id: i64,
    pub email: String,
    pub nickname: String,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
}

/// Authentication response containing tokens and account metadata
///
/// Returned after a successful registration, login or refresh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    /// Signed access token for API authentication
    pub access_token: String,

    /// Signed refresh token bound to a session
    pub refresh_token: String,

    /// Access token expiry (epoch seconds)
    pub expires_at: i64,

    /// Refresh token and session expiry (epoch seconds)
    pub refresh_expires_at: i64,

    /// Session the refresh token belongs to
    pub session_id: uuid::Uuid,

    /// The authenticated account
    pub account: AccountSummary,
}

impl AuthResponse {
    /// Creates an authentication response from an issued pair
    ///
    /// # Arguments
    ///
    /// * `tokens` - The freshly minted token pair
    /// * `session_id` - Session holding `tokens.refresh_token`
    /// * `account` - Account the tokens were issued to
    pub fn from_tokens(tokens: IssuedTokens, session_id: uuid::Uuid, account: AccountSummary) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_at: tokens.access_expires_at,
            refresh_expires_at: tokens.refresh_expires_at,
            session_id,
            account,
        }
    }
}

/// Result of validating an access token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidatedToken {
    pub account_id: i64,
    pub roles: Vec<Role>,
    /// Expiry of the validated token (epoch seconds)
    pub expires_at: i64,
}

impl ValidatedToken {
    pub fn has_role(&self, role: Role) -> bool {
        has_role(&self.roles, role)
    }
}
