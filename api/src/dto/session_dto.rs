use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ks_core::domain::entities::Session;

/// A session as shown to its owner; the refresh token is never included
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub id: Uuid,
    pub client_ips: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<Session> for SessionView {
    fn from(session: Session) -> Self {
        Self {
            id: session.id,
            client_ips: session.client_ips,
            created_at: session.created_at,
            expires_at: session.expires_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminateAllResponse {
    pub terminated: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotateKeysResponse {
    pub key_id: i64,
    pub message: String,
}
