//! Account repository trait defining the interface for identity persistence.

use async_trait::async_trait;

use crate::domain::entities::{Account, NewAccount, Role};
use crate::errors::DomainError;

/// Repository trait for Account persistence operations
///
/// Lookups by email expect the already-normalized (lower-case) address.
/// Implementations must enforce uniqueness of both `email` and `nickname`
/// and report collisions as `AuthError::DuplicateAccount`.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find an account by its ID, roles included
    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, DomainError>;

    /// Find an account by normalized email, roles included
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError>;

    /// Find an account by nickname, roles included
    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<Account>, DomainError>;

    /// Check if an email is already registered
    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError>;

    /// Check if a nickname is already taken
    async fn exists_by_nickname(&self, nickname: &str) -> Result<bool, DomainError>;

    /// Insert a new account without roles
    ///
    /// # Returns
    /// * `Ok(Account)` - The stored account with its assigned ID
    /// * `Err(DomainError::Auth(AuthError::DuplicateAccount { .. }))` - Email or nickname taken
    /// * `Err(DomainError::StoreUnavailable { .. })` - Store failure
    async fn create(&self, account: NewAccount) -> Result<Account, DomainError>;

    /// Delete an account and everything that hangs off it
    ///
    /// # Returns
    /// * `Ok(true)` - Account was deleted
    /// * `Ok(false)` - No account with that ID
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;

    /// Roles currently granted to an account
    async fn find_roles(&self, account_id: i64) -> Result<Vec<Role>, DomainError>;

    /// Grant a role; granting a role the account already holds is a no-op
    async fn assign_role(&self, account_id: i64, role: Role) -> Result<(), DomainError>;
}
