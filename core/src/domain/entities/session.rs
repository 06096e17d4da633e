//! Session entity: the persisted authority for a refresh token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session entity stored in the database
///
/// A refresh token is only honoured while a session holding exactly that
/// token string exists and has not expired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque session identifier
    pub id: Uuid,

    /// Owning account
    pub account_id: i64,

    /// Refresh token currently valid for this session (globally unique)
    #[serde(skip_serializing)]
    pub refresh_token: String,

    /// Client addresses seen for this session, oldest first, no duplicates
    pub client_ips: Vec<String>,

    /// Equal to the `exp` claim of `refresh_token`
    pub expires_at: DateTime<Utc>,

    /// Timestamp when the session row was created
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Creates a new session for a freshly issued refresh token
    pub fn new(
        account_id: i64,
        refresh_token: String,
        expires_at: DateTime<Utc>,
        client_ip: Option<String>,
    ) -> Self {
        let mut session = Self {
            id: Uuid::new_v4(),
            account_id,
            refresh_token,
            client_ips: Vec::new(),
            expires_at,
            created_at: Utc::now(),
        };
        if let Some(ip) = client_ip {
            session.add_client_ip(ip);
        }
        session
    }

    /// Builds the row that replaces this session after a refresh: new ID,
    /// new token and expiry, client addresses carried forward.
    pub fn rotate(
        &self,
        refresh_token: String,
        expires_at: DateTime<Utc>,
        client_ip: Option<String>,
    ) -> Self {
        let mut next = Self::new(self.account_id, refresh_token, expires_at, None);
        next.client_ips = self.client_ips.clone();
        if let Some(ip) = client_ip {
            next.add_client_ip(ip);
        }
        next
    }

    /// Records a client address if it has not been seen before
    pub fn add_client_ip(&mut self, ip: String) {
        let ip = ip.trim().to_string();
        if !ip.is_empty() && !self.client_ips.contains(&ip) {
            self.client_ips.push(ip);
        }
    }

    /// Checks if the session has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Checks expiry against a fixed instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Ownership check
    pub fn belongs_to(&self, account_id: i64) -> bool {
        self.account_id == account_id
    }
}
