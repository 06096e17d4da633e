use super::*;
use crate::domain::entities::NewSigningKey;

fn key(byte: u8) -> NewSigningKey {
    NewSigningKey {
        public_key: vec![byte; 32],
        private_key: vec![byte; 48],
    }
}

#[tokio::test]
async fn test_create_is_inactive() {
    let repo = InMemorySigningKeyRepository::new();
    let stored = repo.create(key(1)).await.unwrap();

    assert!(!stored.active);
    assert!(repo.get_active().await.unwrap().is_none());
    assert_eq!(repo.get_by_id(stored.id).await.unwrap().unwrap().public_key, vec![1; 32]);
}

#[tokio::test]
async fn test_set_active_keeps_single_active_key() {
    let repo = InMemorySigningKeyRepository::new();
    let first = repo.create(key(1)).await.unwrap();
    let second = repo.create(key(2)).await.unwrap();

    assert!(repo.set_active(first.id).await.unwrap());
    assert!(repo.set_active(second.id).await.unwrap());

    let active: Vec<_> = repo.all().await.into_iter().filter(|k| k.active).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, second.id);
}

#[tokio::test]
async fn test_set_active_unknown_id() {
    let repo = InMemorySigningKeyRepository::new();
    let first = repo.create(key(1)).await.unwrap();
    repo.set_active(first.id).await.unwrap();

    assert!(!repo.set_active(42).await.unwrap());
    assert_eq!(repo.get_active().await.unwrap().unwrap().id, first.id);
}
