//! Device bookkeeping entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A client device an account has logged in from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: i64,
    pub account_id: i64,
    /// Stable per-device identifier, unique per account
    pub fingerprint: String,
    pub user_agent: Option<String>,
    pub last_ip: Option<String>,
    pub last_seen_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Insert-or-touch request keyed by `(account_id, fingerprint)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceUpsert {
    pub account_id: i64,
    pub fingerprint: String,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
}
