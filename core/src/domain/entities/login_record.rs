//! Login history entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One successful login, written fire-and-forget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRecord {
    pub account_id: i64,
    pub session_id: uuid::Uuid,
    pub device_fingerprint: Option<String>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub logged_in_at: DateTime<Utc>,
}
