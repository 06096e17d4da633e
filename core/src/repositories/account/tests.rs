use super::*;
use crate::domain::entities::{NewAccount, Role};
use crate::errors::{AuthError, DomainError, DuplicateField};

fn new_account(email: &str, nickname: &str) -> NewAccount {
    NewAccount {
        email: email.to_string(),
        nickname: nickname.to_string(),
        password_hash: "hash".to_string(),
    }
}

#[tokio::test]
async fn test_create_and_find() {
    let repo = InMemoryAccountRepository::new();
    let created = repo.create(new_account("a@example.com", "alice")).await.unwrap();

    assert!(created.roles.is_empty());
    assert_eq!(repo.find_by_id(created.id).await.unwrap().unwrap().email, "a@example.com");
    assert!(repo.find_by_email("a@example.com").await.unwrap().is_some());
    assert!(repo.find_by_nickname("alice").await.unwrap().is_some());
    assert!(repo.exists_by_email("a@example.com").await.unwrap());
    assert!(!repo.exists_by_nickname("bob").await.unwrap());
}

#[tokio::test]
async fn test_create_rejects_duplicates() {
    let repo = InMemoryAccountRepository::new();
    repo.create(new_account("a@example.com", "alice")).await.unwrap();

    let err = repo.create(new_account("a@example.com", "other")).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Auth(AuthError::DuplicateAccount { field: DuplicateField::Email })
    ));

    let err = repo.create(new_account("b@example.com", "alice")).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Auth(AuthError::DuplicateAccount { field: DuplicateField::Nickname })
    ));
}

#[tokio::test]
async fn test_duplicates_ignore_case() {
    let repo = InMemoryAccountRepository::new();
    repo.create(new_account("alice@example.com", "Alice")).await.unwrap();

    let err = repo.create(new_account("ALICE@example.com", "other")).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Auth(AuthError::DuplicateAccount { field: DuplicateField::Email })
    ));

    let err = repo.create(new_account("b@example.com", "alice")).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Auth(AuthError::DuplicateAccount { field: DuplicateField::Nickname })
    ));

    assert!(repo.find_by_nickname("ALICE").await.unwrap().is_some());
    assert!(repo.exists_by_email("Alice@Example.com").await.unwrap());
}

#[tokio::test]
async fn test_assign_role_is_idempotent() {
    let repo = InMemoryAccountRepository::new();
    let account = repo.create(new_account("a@example.com", "alice")).await.unwrap();

    repo.assign_role(account.id, Role::User).await.unwrap();
    repo.assign_role(account.id, Role::User).await.unwrap();
    repo.assign_role(account.id, Role::Admin).await.unwrap();

    assert_eq!(repo.find_roles(account.id).await.unwrap(), vec![Role::User, Role::Admin]);
    assert!(repo.assign_role(999, Role::User).await.is_err());
}

#[tokio::test]
async fn test_delete() {
    let repo = InMemoryAccountRepository::new();
    let account = repo.create(new_account("a@example.com", "alice")).await.unwrap();

    assert!(repo.delete(account.id).await.unwrap());
    assert!(!repo.delete(account.id).await.unwrap());
    assert!(repo.find_by_id(account.id).await.unwrap().is_none());
    assert_eq!(repo.count().await, 0);
}
