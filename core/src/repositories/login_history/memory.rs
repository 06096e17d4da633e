//! In-memory implementation of LoginHistoryRepository

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::LoginHistoryRepository;
use crate::domain::entities::LoginRecord;
use crate::errors::DomainError;

#[derive(Clone, Default)]
pub struct InMemoryLoginHistoryRepository {
    entries: Arc<RwLock<Vec<LoginRecord>>>,
}

impl InMemoryLoginHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl LoginHistoryRepository for InMemoryLoginHistoryRepository {
    async fn record(&self, entry: &LoginRecord) -> Result<(), DomainError> {
        self.entries.write().await.push(entry.clone());
        Ok(())
    }

    async fn find_by_account(
        &self,
        account_id: i64,
        limit: usize,
    ) -> Result<Vec<LoginRecord>, DomainError> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .rev()
            .filter(|e| e.account_id == account_id)
            .take(limit)
            .cloned()
            .collect())
    }
}
