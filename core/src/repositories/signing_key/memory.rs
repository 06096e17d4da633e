//! In-memory implementation of SigningKeyRepository

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::{NewSigningKey, SigningKeyPair};
use crate::errors::DomainError;

use super::r#trait::SigningKeyRepository;

/// Signing key store kept in process memory. Clones share storage.
#[derive(Clone, Default)]
pub struct InMemorySigningKeyRepository {
    keys: Arc<RwLock<Vec<SigningKeyPair>>>,
}

impl InMemorySigningKeyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored pairs in insertion order
    pub async fn all(&self) -> Vec<SigningKeyPair> {
        self.keys.read().await.clone()
    }
}

#[async_trait]
impl SigningKeyRepository for InMemorySigningKeyRepository {
    async fn get_active(&self) -> Result<Option<SigningKeyPair>, DomainError> {
        let keys = self.keys.read().await;
        Ok(keys.iter().find(|k| k.active).cloned())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<SigningKeyPair>, DomainError> {
        let keys = self.keys.read().await;
        Ok(keys.iter().find(|k| k.id == id).cloned())
    }

    async fn create(&self, key: NewSigningKey) -> Result<SigningKeyPair, DomainError> {
        let mut keys = self.keys.write().await;
        let now = Utc::now();
        let stored = SigningKeyPair {
            id: keys.iter().map(|k| k.id).max().unwrap_or(0) + 1,
            public_key: key.public_key,
            private_key: key.private_key,
            active: false,
            created_at: now,
            updated_at: now,
        };
        keys.push(stored.clone());
        Ok(stored)
    }

    async fn set_active(&self, id: i64) -> Result<bool, DomainError> {
        let mut keys = self.keys.write().await;
        if !keys.iter().any(|k| k.id == id) {
            return Ok(false);
        }

        let now = Utc::now();
        for key in keys.iter_mut() {
            let active = key.id == id;
            if key.active != active {
                key.active = active;
                key.updated_at = now;
            }
        }
        Ok(true)
    }
}
