//! Login history repository trait.

use async_trait::async_trait;

use crate::domain::entities::LoginRecord;
use crate::errors::DomainError;

/// Append-only record of successful logins
///
/// Writes are best-effort: callers log and ignore errors from `record`.
#[async_trait]
pub trait LoginHistoryRepository: Send + Sync {
    async fn record(&self, entry: &LoginRecord) -> Result<(), DomainError>;

    /// Most recent entries for an account, newest first
    async fn find_by_account(
        &self,
        account_id: i64,
        limit: usize,
    ) -> Result<Vec<LoginRecord>, DomainError>;
}
