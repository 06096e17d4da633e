//! Client device information captured at the transport edge.

use sha2::{Digest, Sha256};

/// Who is calling: address, user agent and an optional client-supplied
/// device fingerprint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceContext {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub fingerprint: Option<String>,
}

impl DeviceContext {
    pub fn new(ip: Option<String>, user_agent: Option<String>) -> Self {
        Self {
            ip,
            user_agent,
            fingerprint: None,
        }
    }

    pub fn with_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = Some(fingerprint.into());
        self
    }

    /// Device fingerprint used for the device upsert.
    ///
    /// An explicit, non-blank fingerprint wins. Otherwise the fingerprint is
    /// derived as hex SHA-256 of `"<user_agent>|<ip>"`, with missing parts
    /// left empty.
    pub fn fingerprint(&self) -> String {
        if let Some(explicit) = self
            .fingerprint
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
        {
            return explicit.to_string();
        }

        let mut hasher = Sha256::new();
        hasher.update(self.user_agent.as_deref().unwrap_or_default().as_bytes());
        hasher.update(b"|");
        hasher.update(self.ip.as_deref().unwrap_or_default().as_bytes());
        hex::encode(hasher.finalize())
    }
}
