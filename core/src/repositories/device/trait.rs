//! Device repository trait.

use async_trait::async_trait;

use crate::domain::entities::{Device, DeviceUpsert};
use crate::errors::DomainError;

/// Bookkeeping of the devices an account has logged in from
#[async_trait]
pub trait DeviceRepository: Send + Sync {
    /// Insert the device, or refresh `last_seen_at`, user agent and address
    /// when `(account_id, fingerprint)` already exists
    async fn upsert(&self, device: DeviceUpsert) -> Result<Device, DomainError>;

    /// Devices of an account, most recently seen first
    async fn find_by_account(&self, account_id: i64) -> Result<Vec<Device>, DomainError>;
}
