//! In-memory implementation of AccountRepository

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::{Account, NewAccount, Role};
use crate::errors::{AuthError, DomainError, DuplicateField};

use super::r#trait::AccountRepository;

/// Account repository kept in process memory
///
/// Used by tests and local development. Clones share the same storage.
#[derive(Clone)]
pub struct InMemoryAccountRepository {
    accounts: Arc<RwLock<HashMap<i64, Account>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryAccountRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Number of stored accounts
    pub async fn count(&self) -> usize {
        self.accounts.read().await.len()
    }
}

/// Case-insensitive match, as the MySQL `utf8mb4_unicode_ci` columns compare
fn same_key(stored: &str, candidate: &str) -> bool {
    stored.to_lowercase() == candidate.to_lowercase()
}

impl Default for InMemoryAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| same_key(&a.email, email)).cloned())
    }

    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| same_key(&a.nickname, nickname)).cloned())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn exists_by_nickname(&self, nickname: &str) -> Result<bool, DomainError> {
        Ok(self.find_by_nickname(nickname).await?.is_some())
    }

    async fn create(&self, account: NewAccount) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().await;

        // Same guarantees as the unique indexes on the real table
        if accounts.values().any(|a| same_key(&a.email, &account.email)) {
            return Err(AuthError::DuplicateAccount {
                field: DuplicateField::Email,
            }
            .into());
        }
        if accounts.values().any(|a| same_key(&a.nickname, &account.nickname)) {
            return Err(AuthError::DuplicateAccount {
                field: DuplicateField::Nickname,
            }
            .into());
        }

        let now = Utc::now();
        let stored = Account {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            email: account.email,
            nickname: account.nickname,
            password_hash: account.password_hash,
            roles: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        accounts.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut accounts = self.accounts.write().await;
        Ok(accounts.remove(&id).is_some())
    }

    async fn find_roles(&self, account_id: i64) -> Result<Vec<Role>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .get(&account_id)
            .map(|a| a.roles.clone())
            .unwrap_or_default())
    }

    async fn assign_role(&self, account_id: i64, role: Role) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.get_mut(&account_id).ok_or_else(|| {
            DomainError::store("assign role", format!("account {} does not exist", account_id))
        })?;

        if !account.roles.contains(&role) {
            account.roles.push(role);
            account.roles.sort();
            account.updated_at = Utc::now();
        }
        Ok(())
    }
}
