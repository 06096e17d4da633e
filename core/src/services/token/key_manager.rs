//! Ed25519 key material for token signing and verification

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use jsonwebtoken::{DecodingKey, EncodingKey};
use ring::rand::SystemRandom;
use ring::signature::{Ed25519KeyPair, KeyPair};

use crate::domain::entities::{NewSigningKey, SigningKeyPair};
use crate::errors::TokenError;

/// DER prefix of an Ed25519 SubjectPublicKeyInfo; the raw 32-byte key follows
const ED25519_SPKI_PREFIX: [u8; 12] = [
    0x30, 0x2a, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x03, 0x21, 0x00,
];

/// Decoded key pair ready for signing and verifying
///
/// Immutable once built. Rotation replaces the whole value, so a holder of
/// an `Arc<KeyMaterial>` always sees a matching public/private half.
pub struct KeyMaterial {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    public_key: Vec<u8>,
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("public_key", &hex::encode(&self.public_key))
            .finish_non_exhaustive()
    }
}

impl KeyMaterial {
    /// Generates a fresh Ed25519 pair
    ///
    /// # Returns
    ///
    /// The decoded material for the cache and the encoded form to persist
    pub fn generate() -> Result<(Self, NewSigningKey), TokenError> {
        let rng = SystemRandom::new();
        let pkcs8 =
            Ed25519KeyPair::generate_pkcs8(&rng).map_err(|_| TokenError::KeyGenerationFailed)?;
        let private_key = pkcs8.as_ref().to_vec();

        let pair =
            Ed25519KeyPair::from_pkcs8(&private_key).map_err(|_| TokenError::KeyGenerationFailed)?;
        let public_key = pair.public_key().as_ref().to_vec();

        let material = Self::build(&private_key, public_key.clone())?;
        Ok((
            material,
            NewSigningKey {
                public_key,
                private_key,
            },
        ))
    }

    /// Decodes a pair loaded from the signing key store
    ///
    /// The stored public half must be the one derived from the private half.
    pub fn from_stored(stored: &SigningKeyPair) -> Result<Self, TokenError> {
        let pair = Ed25519KeyPair::from_pkcs8(&stored.private_key).map_err(|e| {
            TokenError::KeyDecodeFailed {
                message: format!("key {}: invalid PKCS#8 private key: {}", stored.id, e),
            }
        })?;

        if pair.public_key().as_ref() != stored.public_key.as_slice() {
            return Err(TokenError::KeyDecodeFailed {
                message: format!("key {}: public key does not match private key", stored.id),
            });
        }

        Self::build(&stored.private_key, stored.public_key.clone())
    }

    fn build(pkcs8: &[u8], public_key: Vec<u8>) -> Result<Self, TokenError> {
        let encoding_key = EncodingKey::from_ed_der(pkcs8);
        let decoding_key = DecodingKey::from_ed_components(&URL_SAFE_NO_PAD.encode(&public_key))
            .map_err(|e| TokenError::KeyDecodeFailed {
                message: format!("invalid public key: {}", e),
            })?;

        Ok(Self {
            encoding_key,
            decoding_key,
            public_key,
        })
    }

    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    /// Raw 32-byte public key
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// Public key as a PEM encoded SubjectPublicKeyInfo
    pub fn public_key_pem(&self) -> String {
        let mut der = Vec::with_capacity(ED25519_SPKI_PREFIX.len() + self.public_key.len());
        der.extend_from_slice(&ED25519_SPKI_PREFIX);
        der.extend_from_slice(&self.public_key);

        let body = STANDARD.encode(der);
        let mut pem = String::from("-----BEGIN PUBLIC KEY-----\n");
        for line in body.as_bytes().chunks(64) {
            // base64 output is ASCII
            pem.push_str(&String::from_utf8_lossy(line));
            pem.push('\n');
        }
        pem.push_str("-----END PUBLIC KEY-----\n");
        pem
    }
}
