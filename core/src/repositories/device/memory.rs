//! In-memory implementation of DeviceRepository

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::{Device, DeviceUpsert};
use crate::errors::DomainError;

use super::r#trait::DeviceRepository;

/// Device repository kept in process memory. Clones share storage.
#[derive(Clone, Default)]
pub struct InMemoryDeviceRepository {
    devices: Arc<RwLock<HashMap<(i64, String), Device>>>,
}

impl InMemoryDeviceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DeviceRepository for InMemoryDeviceRepository {
    async fn upsert(&self, device: DeviceUpsert) -> Result<Device, DomainError> {
        let mut devices = self.devices.write().await;
        let now = Utc::now();
        let next_id = devices.len() as i64 + 1;

        let entry = devices
            .entry((device.account_id, device.fingerprint.clone()))
            .or_insert_with(|| Device {
                id: next_id,
                account_id: device.account_id,
                fingerprint: device.fingerprint.clone(),
                user_agent: None,
                last_ip: None,
                last_seen_at: now,
                created_at: now,
            });

        if device.user_agent.is_some() {
            entry.user_agent = device.user_agent;
        }
        if device.ip.is_some() {
            entry.last_ip = device.ip;
        }
        entry.last_seen_at = now;

        Ok(entry.clone())
    }

    async fn find_by_account(&self, account_id: i64) -> Result<Vec<Device>, DomainError> {
        let devices = self.devices.read().await;
        let mut found: Vec<Device> = devices
            .values()
            .filter(|d| d.account_id == account_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.last_seen_at.cmp(&a.last_seen_at));
        Ok(found)
    }
}
