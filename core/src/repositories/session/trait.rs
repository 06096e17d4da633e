//! Session repository trait defining the interface for session persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::Session;
use crate::errors::DomainError;

/// Repository trait for Session persistence operations
///
/// The refresh token string is unique across all sessions; lookups by token
/// are exact matches.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a new session
    async fn create(&self, session: Session) -> Result<Session, DomainError>;

    /// Find a session by its ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, DomainError>;

    /// Find the session currently holding `refresh_token`
    async fn find_by_refresh_token(&self, refresh_token: &str)
        -> Result<Option<Session>, DomainError>;

    /// All sessions of an account, expired ones included, newest first
    async fn find_by_account(&self, account_id: i64) -> Result<Vec<Session>, DomainError>;

    /// Delete a session by ID
    ///
    /// # Returns
    /// * `Ok(true)` - Session was deleted
    /// * `Ok(false)` - Session not found
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Delete the session holding `refresh_token`
    async fn delete_by_refresh_token(&self, refresh_token: &str) -> Result<bool, DomainError>;

    /// Delete every session of an account, returning how many were removed
    async fn delete_by_account(&self, account_id: i64) -> Result<usize, DomainError>;

    /// Atomically delete `old_id` and insert `replacement`
    ///
    /// This is the refresh-rotation primitive. Two concurrent refreshes with
    /// the same token race on the delete; only one sees the row.
    ///
    /// # Returns
    /// * `Ok(true)` - Old session removed and replacement stored
    /// * `Ok(false)` - Old session was already gone; nothing was written
    async fn replace(&self, old_id: Uuid, replacement: Session) -> Result<bool, DomainError>;

    /// Delete sessions whose `expires_at` is before `now`
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError>;
}
