//! Unit tests for token service

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;

use crate::domain::entities::{
    Claims, NewSigningKey, Role, SigningKeyPair, TokenType,
};
use crate::errors::{DomainError, TokenError};
use crate::repositories::{InMemorySigningKeyRepository, SigningKeyRepository};
use crate::services::token::{KeyMaterial, TokenService, TokenServiceConfig};

async fn create_service() -> (TokenService<InMemorySigningKeyRepository>, InMemorySigningKeyRepository) {
    let repo = InMemorySigningKeyRepository::new();
    let service = TokenService::new(Arc::new(repo.clone()), TokenServiceConfig::default())
        .await
        .unwrap();
    (service, repo)
}

fn claims(ttl: Duration) -> Claims {
    Claims::new(42, vec![Role::User], TokenType::Access, ttl, "keystone")
}

/// Replaces the character at `index` with a different base64url character
fn flip_char(token: &str, index: usize) -> String {
    let mut chars: Vec<char> = token.chars().collect();
    chars[index] = if chars[index] == 'A' { 'B' } else { 'A' };
    chars.into_iter().collect()
}

/// Key store whose every call fails
struct UnavailableKeyRepository;

#[async_trait]
impl SigningKeyRepository for UnavailableKeyRepository {
    async fn get_active(&self) -> Result<Option<SigningKeyPair>, DomainError> {
        Err(DomainError::store("get active key", "connection refused"))
    }

    async fn get_by_id(&self, _id: i64) -> Result<Option<SigningKeyPair>, DomainError> {
        Err(DomainError::store("get key", "connection refused"))
    }

    async fn create(&self, _key: NewSigningKey) -> Result<SigningKeyPair, DomainError> {
        Err(DomainError::store("create key", "connection refused"))
    }

    async fn set_active(&self, _id: i64) -> Result<bool, DomainError> {
        Err(DomainError::store("activate key", "connection refused"))
    }
}

#[tokio::test]
async fn test_new_generates_and_persists_active_key() {
    let (service, repo) = create_service().await;

    let active = repo.get_active().await.unwrap().expect("active key");
    assert_eq!(active.public_key, service.public_key());
    assert_eq!(repo.all().await.len(), 1);
}

#[tokio::test]
async fn test_new_loads_existing_active_key() {
    let (first, repo) = create_service().await;
    let token = first.sign(&claims(Duration::minutes(5))).unwrap();

    // A second instance over the same store reuses the key
    let second = TokenService::new(Arc::new(repo.clone()), TokenServiceConfig::default())
        .await
        .unwrap();

    assert_eq!(first.public_key(), second.public_key());
    assert_eq!(second.verify(&token).unwrap().sub, "42");
    assert_eq!(repo.all().await.len(), 1);
}

#[tokio::test]
async fn test_new_fails_when_store_unavailable() {
    let result =
        TokenService::new(Arc::new(UnavailableKeyRepository), TokenServiceConfig::default()).await;
    assert!(matches!(result, Err(DomainError::StoreUnavailable { .. })));
}

#[tokio::test]
async fn test_sign_verify_round_trip() {
    let (service, _) = create_service().await;
    let original = claims(Duration::minutes(5));

    let token = service.sign(&original).unwrap();
    assert_eq!(token.split('.').count(), 3);

    let verified = service.verify(&token).unwrap();
    assert_eq!(verified, original);
}

#[tokio::test]
async fn test_tampered_claims_rejected_as_bad_signature() {
    let (service, _) = create_service().await;
    let token = service.sign(&claims(Duration::minutes(5))).unwrap();

    let header_len = token.find('.').unwrap();
    let claims_len = token[header_len + 1..].find('.').unwrap();
    let tampered = flip_char(&token, header_len + 1 + claims_len / 2);

    assert!(matches!(service.verify(&tampered), Err(TokenError::SignatureInvalid)));
}

#[tokio::test]
async fn test_tampered_signature_rejected_as_bad_signature() {
    let (service, _) = create_service().await;
    let token = service.sign(&claims(Duration::minutes(5))).unwrap();

    let signature_start = token.rfind('.').unwrap() + 1;
    let signature_len = token.len() - signature_start;
    for offset in [0, signature_len / 3, signature_len / 2] {
        let tampered = flip_char(&token, signature_start + offset);
        assert!(
            matches!(service.verify(&tampered), Err(TokenError::SignatureInvalid)),
            "offset {} accepted",
            offset
        );
    }
}

#[tokio::test]
async fn test_every_byte_flip_rejected_as_bad_signature() {
    let (service, _) = create_service().await;
    let token = service.sign(&claims(Duration::minutes(5))).unwrap();

    for index in 0..token.len() {
        let mut bytes = token.clone().into_bytes();
        bytes[index] ^= 0x01;
        let tampered = String::from_utf8(bytes).unwrap();

        let result = service.verify(&tampered);
        assert!(
            matches!(result, Err(TokenError::SignatureInvalid)),
            "byte {} ({:?}) gave {:?}",
            index,
            token.as_bytes()[index] as char,
            result.map(|c| c.jti)
        );
    }
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let (service, _) = create_service().await;
    let token = service.sign(&claims(Duration::seconds(-1))).unwrap();

    assert!(matches!(service.verify(&token), Err(TokenError::Expired)));
}

#[tokio::test]
async fn test_malformed_tokens_rejected() {
    let (service, _) = create_service().await;

    for garbage in ["", "not-a-token", "a.b.c", "a.b", "!!!.???.***"] {
        assert!(
            matches!(service.verify(garbage), Err(TokenError::Malformed)),
            "{:?} accepted",
            garbage
        );
    }
}

#[tokio::test]
async fn test_wrong_issuer_rejected() {
    let (service, _) = create_service().await;
    let foreign = Claims::new(1, vec![], TokenType::Access, Duration::minutes(5), "someone-else");
    let token = service.sign(&foreign).unwrap();

    assert!(matches!(service.verify(&token), Err(TokenError::Malformed)));
}

#[tokio::test]
async fn test_token_from_other_key_rejected() {
    let (service, _) = create_service().await;
    let (other, _) = create_service().await;
    let token = other.sign(&claims(Duration::minutes(5))).unwrap();

    assert!(matches!(service.verify(&token), Err(TokenError::SignatureInvalid)));
}

#[tokio::test]
async fn test_issue_pair() {
    let (service, _) = create_service().await;
    let pair = service
        .issue_pair(7, &[Role::User, Role::Admin], Duration::minutes(15), Duration::days(7))
        .unwrap();

    assert_ne!(pair.access_token, pair.refresh_token);
    assert!(pair.refresh_expires_at > pair.access_expires_at);

    let access = service.verify(&pair.access_token).unwrap();
    let refresh = service.verify(&pair.refresh_token).unwrap();
    assert_eq!(access.typ, TokenType::Access);
    assert_eq!(refresh.typ, TokenType::Refresh);
    assert_eq!(access.sub, refresh.sub);
    assert_eq!(access.roles, vec![Role::User, Role::Admin]);
    assert_eq!(access.exp, pair.access_expires_at);
}

#[tokio::test]
async fn test_issue_pair_twice_differs() {
    let (service, _) = create_service().await;
    let a = service.issue_default_pair(1, &[Role::User]).unwrap();
    let b = service.issue_default_pair(1, &[Role::User]).unwrap();

    assert_ne!(a.access_token, b.access_token);
    assert_ne!(a.refresh_token, b.refresh_token);
}

#[tokio::test]
async fn test_validate_access_token_rejects_refresh_token() {
    let (service, _) = create_service().await;
    let pair = service.issue_default_pair(1, &[Role::User]).unwrap();

    assert!(service.validate_access_token(&pair.access_token).is_ok());
    assert!(matches!(
        service.validate_access_token(&pair.refresh_token),
        Err(TokenError::UnexpectedType)
    ));
}

#[tokio::test]
async fn test_regenerate_keys_invalidates_old_tokens() {
    let (service, repo) = create_service().await;
    let old_public = service.public_key();
    let old_token = service.sign(&claims(Duration::minutes(5))).unwrap();

    let new_id = service.regenerate_keys().await.unwrap();

    assert_ne!(service.public_key(), old_public);
    assert!(matches!(service.verify(&old_token), Err(TokenError::SignatureInvalid)));

    let new_token = service.sign(&claims(Duration::minutes(5))).unwrap();
    assert!(service.verify(&new_token).is_ok());

    let keys = repo.all().await;
    assert_eq!(keys.len(), 2);
    assert_eq!(keys.iter().filter(|k| k.active).count(), 1);
    assert_eq!(repo.get_active().await.unwrap().unwrap().id, new_id);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_rotation_never_exposes_half_updated_keys() {
    let (service, repo) = create_service().await;
    let service = Arc::new(service);

    let mut readers = Vec::new();
    for _ in 0..4 {
        let service = service.clone();
        readers.push(tokio::spawn(async move {
            for _ in 0..50 {
                // A snapshot must always verify what it signed itself
                let keys: Arc<KeyMaterial> = service.current_keys();
                let token = jsonwebtoken::encode(
                    &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::EdDSA),
                    &claims(Duration::minutes(5)),
                    keys.encoding_key(),
                )
                .unwrap();
                let mut validation = jsonwebtoken::Validation::new(jsonwebtoken::Algorithm::EdDSA);
                validation.set_issuer(&["keystone"]);
                assert!(jsonwebtoken::decode::<Claims>(&token, keys.decoding_key(), &validation).is_ok());

                // Through the service, a rotation in between is the only
                // possible failure
                let token = service.sign(&claims(Duration::minutes(5))).unwrap();
                match service.verify(&token) {
                    Ok(_) | Err(TokenError::SignatureInvalid) => {}
                    Err(other) => panic!("unexpected verification error: {:?}", other),
                }
                tokio::task::yield_now().await;
            }
        }));
    }

    for _ in 0..5 {
        service.regenerate_keys().await.unwrap();
        tokio::task::yield_now().await;
    }

    for reader in readers {
        reader.await.unwrap();
    }

    let keys = repo.all().await;
    assert_eq!(keys.len(), 6);
    assert_eq!(keys.iter().filter(|k| k.active).count(), 1);
    assert_eq!(repo.get_active().await.unwrap().unwrap().public_key, service.public_key());
}

#[tokio::test]
async fn test_public_key_pem_matches_raw_key() {
    use base64::Engine;

    let (service, _) = create_service().await;
    let pem = service.public_key_pem();
    let body = pem.lines().nth(1).unwrap();
    let der = base64::engine::general_purpose::STANDARD.decode(body).unwrap();

    assert_eq!(&der[12..], service.public_key().as_slice());
}
