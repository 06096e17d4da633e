//! In-memory implementation of SessionRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::Session;
use crate::errors::DomainError;

use super::r#trait::SessionRepository;

/// Session repository kept in process memory. Clones share storage.
#[derive(Clone, Default)]
pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, expired ones included
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

fn token_taken(sessions: &HashMap<Uuid, Session>, token: &str) -> bool {
    sessions.values().any(|s| s.refresh_token == token)
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, session: Session) -> Result<Session, DomainError> {
        let mut sessions = self.sessions.write().await;

        if sessions.contains_key(&session.id) || token_taken(&sessions, &session.refresh_token) {
            return Err(DomainError::store("create session", "duplicate session"));
        }

        sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, DomainError> {
        Ok(self.sessions.read().await.get(&id).cloned())
    }

    async fn find_by_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<Session>, DomainError> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .values()
            .find(|s| s.refresh_token == refresh_token)
            .cloned())
    }

    async fn find_by_account(&self, account_id: i64) -> Result<Vec<Session>, DomainError> {
        let sessions = self.sessions.read().await;
        let mut found: Vec<Session> = sessions
            .values()
            .filter(|s| s.account_id == account_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        Ok(self.sessions.write().await.remove(&id).is_some())
    }

    async fn delete_by_refresh_token(&self, refresh_token: &str) -> Result<bool, DomainError> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.refresh_token != refresh_token);
        Ok(sessions.len() < before)
    }

    async fn delete_by_account(&self, account_id: i64) -> Result<usize, DomainError> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.account_id != account_id);
        Ok(before - sessions.len())
    }

    async fn replace(&self, old_id: Uuid, replacement: Session) -> Result<bool, DomainError> {
        // One write guard covers both halves, so the swap is atomic
        let mut sessions = self.sessions.write().await;

        if sessions.remove(&old_id).is_none() {
            return Ok(false);
        }
        sessions.insert(replacement.id, replacement);
        Ok(true)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired_at(now));
        Ok(before - sessions.len())
    }
}
