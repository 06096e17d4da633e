//! Main token service implementation

use std::sync::{Arc, PoisonError, RwLock};

use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{crypto, decode, encode, Algorithm, Header, Validation};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::entities::{Claims, IssuedTokens, Role, TokenType};
use crate::errors::{DomainError, TokenError};
use crate::repositories::SigningKeyRepository;

use super::config::TokenServiceConfig;
use super::key_manager::KeyMaterial;

/// Base64url length of an unpadded 64-byte Ed25519 signature
const SIGNATURE_ENCODED_LEN: usize = 86;

/// Splits a compact token into its signed message and signature segment
///
/// Input whose trailing segment is too short to carry an Ed25519 signature
/// is not a signed token at all.
fn split_signed(token: &str) -> Option<(&str, &str)> {
    let (message, signature) = token.rsplit_once('.')?;
    if message.is_empty() || signature.len() < SIGNATURE_ENCODED_LEN {
        return None;
    }
    Some((message, signature))
}

/// Signs and verifies tokens with the active Ed25519 key pair
///
/// The decoded pair is cached in memory. Verification never touches the
/// signing key store; only startup and rotation do.
pub struct TokenService<K: SigningKeyRepository> {
    repository: Arc<K>,
    config: TokenServiceConfig,
    keys: RwLock<Arc<KeyMaterial>>,
    /// Serializes rotations so two concurrent calls cannot interleave their
    /// persistence steps
    rotation: Mutex<()>,
    validation: Validation,
}

impl<K: SigningKeyRepository> TokenService<K> {
    /// Creates a token service, loading the active key pair or generating
    /// and persisting one when the store has none
    ///
    /// # Arguments
    ///
    /// * `repository` - Signing key store
    /// * `config` - Issuer and token lifetimes
    ///
    /// # Returns
    ///
    /// * `Ok(TokenService)` - Keys cached and ready
    /// * `Err(DomainError::StoreUnavailable)` - The key store could not be read or written
    /// * `Err(DomainError::Token)` - The stored active key could not be decoded
    pub async fn new(repository: Arc<K>, config: TokenServiceConfig) -> Result<Self, DomainError> {
        let material = Self::load_or_generate_keys(repository.as_ref()).await?;

        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.leeway = 0;
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);

        Ok(Self {
            repository,
            config,
            keys: RwLock::new(Arc::new(material)),
            rotation: Mutex::new(()),
            validation,
        })
    }

    async fn load_or_generate_keys(repository: &K) -> Result<KeyMaterial, DomainError> {
        if let Some(active) = repository.get_active().await? {
            let material = KeyMaterial::from_stored(&active)?;
            info!(key_id = active.id, "Loaded active signing key");
            return Ok(material);
        }

        let (material, new_key) = KeyMaterial::generate()?;
        let stored = repository.create(new_key).await?;
        repository.set_active(stored.id).await?;
        info!(key_id = stored.id, "Generated initial signing key");
        Ok(material)
    }

    /// Replaces the signing key pair
    ///
    /// The new pair is cached before it is persisted, so tokens signed from
    /// this point on use it even if persistence fails. Tokens signed with
    /// the previous pair stop verifying immediately.
    ///
    /// # Returns
    ///
    /// * `Ok(i64)` - ID of the new active pair
    /// * `Err(DomainError::StoreUnavailable)` - The new pair is cached but not persisted
    pub async fn regenerate_keys(&self) -> Result<i64, DomainError> {
        let _rotation = self.rotation.lock().await;

        let (material, new_key) = KeyMaterial::generate()?;
        {
            let mut keys = self.keys.write().unwrap_or_else(PoisonError::into_inner);
            *keys = Arc::new(material);
        }

        let stored = self.repository.create(new_key).await?;
        if !self.repository.set_active(stored.id).await? {
            return Err(DomainError::store(
                "activate signing key",
                format!("key {} vanished before activation", stored.id),
            ));
        }

        warn!(key_id = stored.id, "Signing key rotated; previously issued tokens are no longer valid");
        Ok(stored.id)
    }

    /// Snapshot of the cached key pair
    pub(crate) fn current_keys(&self) -> Arc<KeyMaterial> {
        self.keys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Signs `claims` with the cached private key
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        let keys = self.current_keys();
        encode(&Header::new(Algorithm::EdDSA), claims, keys.encoding_key()).map_err(|e| {
            warn!(error = %e, "Failed to sign token");
            TokenError::GenerationFailed
        })
    }

    /// Verifies signature, issuer and expiry, returning the claims
    ///
    /// The signature is checked over the raw `header.claims` bytes before
    /// anything is decoded, so a token altered anywhere after signing is
    /// reported as a bad signature rather than a decoding failure.
    ///
    /// # Returns
    ///
    /// * `Err(TokenError::SignatureInvalid)` - Signature does not match the cached public key
    /// * `Err(TokenError::Expired)` - Signature valid but `exp` is in the past
    /// * `Err(TokenError::Malformed)` - Not a signed token, or signed claims that fail validation
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let keys = self.current_keys();

        let (message, signature) = split_signed(token).ok_or_else(|| {
            debug!("Token rejected: not a compact signed token");
            TokenError::Malformed
        })?;

        match crypto::verify(signature, message.as_bytes(), keys.decoding_key(), Algorithm::EdDSA) {
            Ok(true) => {}
            Ok(false) => {
                debug!("Token rejected: signature mismatch");
                return Err(TokenError::SignatureInvalid);
            }
            Err(e) => {
                debug!(error = %e, "Token rejected: signature undecodable");
                return Err(TokenError::SignatureInvalid);
            }
        }

        decode::<Claims>(token, keys.decoding_key(), &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let mapped = match e.kind() {
                    ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Malformed,
                };
                debug!(error = %e, "Token rejected");
                mapped
            })
    }

    /// Verifies an access token; refresh tokens are rejected
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = self.verify(token)?;
        if claims.typ != TokenType::Access {
            return Err(TokenError::UnexpectedType);
        }
        claims.account_id()?;
        Ok(claims)
    }

    /// Signs an access and a refresh token for the same subject and roles
    pub fn issue_pair(
        &self,
        account_id: i64,
        roles: &[Role],
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Result<IssuedTokens, TokenError> {
        let access = Claims::new(
            account_id,
            roles.to_vec(),
            TokenType::Access,
            access_ttl,
            &self.config.issuer,
        );
        let refresh = Claims::new(
            account_id,
            roles.to_vec(),
            TokenType::Refresh,
            refresh_ttl,
            &self.config.issuer,
        );

        Ok(IssuedTokens {
            access_token: self.sign(&access)?,
            refresh_token: self.sign(&refresh)?,
            access_expires_at: access.exp,
            refresh_expires_at: refresh.exp,
        })
    }

    /// [`TokenService::issue_pair`] with the configured lifetimes
    pub fn issue_default_pair(
        &self,
        account_id: i64,
        roles: &[Role],
    ) -> Result<IssuedTokens, TokenError> {
        self.issue_pair(
            account_id,
            roles,
            self.config.access_token_ttl,
            self.config.refresh_token_ttl,
        )
    }

    /// Raw public key bytes of the active pair
    pub fn public_key(&self) -> Vec<u8> {
        self.current_keys().public_key().to_vec()
    }

    /// Active public key as SubjectPublicKeyInfo PEM
    pub fn public_key_pem(&self) -> String {
        self.current_keys().public_key_pem()
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }
}
