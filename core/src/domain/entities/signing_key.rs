//! Signing key pair entity.

use chrono::{DateTime, Utc};

/// Asymmetric key pair used to sign and verify tokens
///
/// At most one stored pair has `active = true`.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKeyPair {
    /// Identifier assigned by the store
    pub id: i64,

    /// Raw Ed25519 public key (32 bytes)
    pub public_key: Vec<u8>,

    /// PKCS#8 DER encoded private key
    pub private_key: Vec<u8>,

    /// Whether this pair signs and verifies tokens
    pub active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for SigningKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeyPair")
            .field("id", &self.id)
            .field("public_key", &hex::encode(&self.public_key))
            .field("active", &self.active)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// Key material to insert; the store assigns the ID and timestamps and
/// inserts it inactive.
#[derive(Clone)]
pub struct NewSigningKey {
    pub public_key: Vec<u8>,
    pub private_key: Vec<u8>,
}

impl std::fmt::Debug for NewSigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewSigningKey")
            .field("public_key", &hex::encode(&self.public_key))
            .finish_non_exhaustive()
    }
}
