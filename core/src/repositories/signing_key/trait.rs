//! Signing key store trait.

use async_trait::async_trait;

use crate::domain::entities::{NewSigningKey, SigningKeyPair};
use crate::errors::DomainError;

/// Durable storage for signing key pairs
///
/// At most one stored pair is active at any time.
#[async_trait]
pub trait SigningKeyRepository: Send + Sync {
    /// The currently active pair, if any
    async fn get_active(&self) -> Result<Option<SigningKeyPair>, DomainError>;

    /// Look up a pair by ID, active or not
    async fn get_by_id(&self, id: i64) -> Result<Option<SigningKeyPair>, DomainError>;

    /// Store a new pair. It is inserted inactive; call
    /// [`SigningKeyRepository::set_active`] to promote it.
    async fn create(&self, key: NewSigningKey) -> Result<SigningKeyPair, DomainError>;

    /// Mark `id` active and every other pair inactive, atomically
    ///
    /// # Returns
    /// * `Ok(true)` - Pair promoted
    /// * `Ok(false)` - No pair with that ID; nothing changed
    async fn set_active(&self, id: i64) -> Result<bool, DomainError>;
}
