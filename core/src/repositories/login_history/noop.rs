//! No-op implementation of LoginHistoryRepository for deployments that do
//! not keep login history

use async_trait::async_trait;

use super::LoginHistoryRepository;
use crate::domain::entities::LoginRecord;
use crate::errors::DomainError;

pub struct NoOpLoginHistoryRepository;

impl NoOpLoginHistoryRepository {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpLoginHistoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LoginHistoryRepository for NoOpLoginHistoryRepository {
    async fn record(&self, _entry: &LoginRecord) -> Result<(), DomainError> {
        Ok(())
    }

    async fn find_by_account(
        &self,
        _account_id: i64,
        _limit: usize,
    ) -> Result<Vec<LoginRecord>, DomainError> {
        Ok(Vec::new())
    }
}
