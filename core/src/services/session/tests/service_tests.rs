//! Unit tests for session lifecycle service

use chrono::{Duration, Utc};
use uuid::Uuid;

use super::{create_account, fixture};
use crate::domain::entities::{Role, Session, TokenType};
use crate::errors::{AuthError, DomainError, SessionError, TokenError};
use crate::repositories::{AccountRepository, SessionRepository};

#[tokio::test]
async fn test_start_session_matches_refresh_expiry() {
    let f = fixture().await;
    let account = create_account(&f.accounts, "alice").await;

    let (tokens, session) = f
        .service
        .start_session(&account, Some("10.0.0.1".to_string()))
        .await
        .unwrap();

    assert_eq!(session.refresh_token, tokens.refresh_token);
    assert_eq!(session.expires_at.timestamp(), tokens.refresh_expires_at);
    assert_eq!(session.client_ips, vec!["10.0.0.1"]);

    let claims = f.tokens.verify(&tokens.refresh_token).unwrap();
    assert_eq!(claims.exp, session.expires_at.timestamp());
    assert_eq!(claims.typ, TokenType::Refresh);
}

#[tokio::test]
async fn test_refresh_rotates_session() {
    let f = fixture().await;
    let account = create_account(&f.accounts, "alice").await;
    let (tokens, old) = f.service.start_session(&account, Some("10.0.0.1".into())).await.unwrap();

    let outcome = f
        .service
        .refresh(&tokens.refresh_token, Some("10.0.0.2".into()))
        .await
        .unwrap();

    assert_ne!(outcome.session.id, old.id);
    assert_ne!(outcome.tokens.refresh_token, tokens.refresh_token);
    assert_eq!(outcome.session.client_ips, vec!["10.0.0.1", "10.0.0.2"]);
    assert!(f.sessions.find_by_id(old.id).await.unwrap().is_none());
    assert_eq!(f.sessions.count().await, 1);

    // The old token is single-use
    let err = f.service.refresh(&tokens.refresh_token, None).await.unwrap_err();
    assert!(matches!(err, DomainError::Session(SessionError::NotFound)));

    // The new one works exactly once
    f.service.refresh(&outcome.tokens.refresh_token, None).await.unwrap();
    let err = f
        .service
        .refresh(&outcome.tokens.refresh_token, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Session(SessionError::NotFound)));
}

#[tokio::test]
async fn test_refresh_picks_up_role_changes() {
    let f = fixture().await;
    let account = create_account(&f.accounts, "alice").await;
    let (tokens, _) = f.service.start_session(&account, None).await.unwrap();

    f.accounts.assign_role(account.id, Role::Moderator).await.unwrap();

    let outcome = f.service.refresh(&tokens.refresh_token, None).await.unwrap();
    let claims = f.tokens.verify(&outcome.tokens.access_token).unwrap();
    assert_eq!(claims.roles, vec![Role::User, Role::Moderator]);
    assert_eq!(outcome.account.roles, vec![Role::User, Role::Moderator]);
}

#[tokio::test]
async fn test_refresh_unknown_token() {
    let f = fixture().await;
    let err = f.service.refresh("no-such-token", None).await.unwrap_err();
    assert!(matches!(err, DomainError::Session(SessionError::NotFound)));
}

#[tokio::test]
async fn test_refresh_well_signed_token_without_session() {
    let f = fixture().await;
    let account = create_account(&f.accounts, "alice").await;
    let orphan = f.tokens.issue_default_pair(account.id, &account.roles).unwrap();

    let err = f.service.refresh(&orphan.refresh_token, None).await.unwrap_err();
    assert!(matches!(err, DomainError::Session(SessionError::NotFound)));
}

#[tokio::test]
async fn test_refresh_expired_session_is_deleted() {
    let f = fixture().await;
    let account = create_account(&f.accounts, "alice").await;
    let tokens = f.tokens.issue_default_pair(account.id, &account.roles).unwrap();
    let stale = Session::new(
        account.id,
        tokens.refresh_token.clone(),
        Utc::now() - Duration::seconds(1),
        None,
    );
    f.sessions.create(stale.clone()).await.unwrap();

    let err = f.service.refresh(&tokens.refresh_token, None).await.unwrap_err();
    assert!(matches!(err, DomainError::Session(SessionError::Expired)));
    assert!(f.sessions.find_by_id(stale.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_refresh_subject_mismatch_is_forbidden() {
    let f = fixture().await;
    let alice = create_account(&f.accounts, "alice").await;
    let bob = create_account(&f.accounts, "bob").await;

    // Bob's token stored against Alice's session
    let tokens = f.tokens.issue_default_pair(bob.id, &bob.roles).unwrap();
    let session = Session::new(
        alice.id,
        tokens.refresh_token.clone(),
        Utc::now() + Duration::days(1),
        None,
    );
    f.sessions.create(session).await.unwrap();

    let err = f.service.refresh(&tokens.refresh_token, None).await.unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::Forbidden)));
}

#[tokio::test]
async fn test_refresh_with_unverifiable_token() {
    let f = fixture().await;
    let account = create_account(&f.accounts, "alice").await;
    let session = Session::new(
        account.id,
        "opaque-garbage".to_string(),
        Utc::now() + Duration::days(1),
        None,
    );
    f.sessions.create(session).await.unwrap();

    let err = f.service.refresh("opaque-garbage", None).await.unwrap_err();
    assert!(matches!(err, DomainError::Token(TokenError::Malformed)));
}

#[tokio::test]
async fn test_refresh_after_account_deleted() {
    let f = fixture().await;
    let account = create_account(&f.accounts, "alice").await;
    let (tokens, session) = f.service.start_session(&account, None).await.unwrap();

    f.accounts.delete(account.id).await.unwrap();

    let err = f.service.refresh(&tokens.refresh_token, None).await.unwrap_err();
    assert!(matches!(err, DomainError::Session(SessionError::NotFound)));
    assert!(f.sessions.find_by_id(session.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_refresh_after_key_rotation_fails() {
    let f = fixture().await;
    let account = create_account(&f.accounts, "alice").await;
    let (tokens, _) = f.service.start_session(&account, None).await.unwrap();

    f.tokens.regenerate_keys().await.unwrap();

    let err = f.service.refresh(&tokens.refresh_token, None).await.unwrap_err();
    assert!(matches!(err, DomainError::Token(TokenError::SignatureInvalid)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_refresh_succeeds_once() {
    let f = fixture().await;
    let account = create_account(&f.accounts, "alice").await;
    let (tokens, _) = f.service.start_session(&account, None).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = f.service.clone();
        let token = tokens.refresh_token.clone();
        handles.push(tokio::spawn(async move { service.refresh(&token, None).await }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(DomainError::Session(SessionError::NotFound)) => {}
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(f.sessions.count().await, 1);
}

#[tokio::test]
async fn test_logout_twice_reports_not_found() {
    let f = fixture().await;
    let account = create_account(&f.accounts, "alice").await;
    let (tokens, _) = f.service.start_session(&account, None).await.unwrap();

    f.service.logout(&tokens.refresh_token).await.unwrap();
    let err = f.service.logout(&tokens.refresh_token).await.unwrap_err();
    assert!(matches!(err, DomainError::Session(SessionError::NotFound)));

    let err = f.service.refresh(&tokens.refresh_token, None).await.unwrap_err();
    assert!(matches!(err, DomainError::Session(SessionError::NotFound)));
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let f = fixture().await;
    let account = create_account(&f.accounts, "alice").await;
    let (first_tokens, first) = f.service.start_session(&account, Some("10.0.0.1".into())).await.unwrap();
    let (second_tokens, second) = f.service.start_session(&account, Some("10.0.0.2".into())).await.unwrap();

    assert_ne!(first.id, second.id);
    assert_ne!(first_tokens.refresh_token, second_tokens.refresh_token);
    assert_eq!(f.service.list_sessions(account.id).await.unwrap().len(), 2);

    f.service.terminate(first.id, account.id).await.unwrap();

    assert_eq!(f.service.list_sessions(account.id).await.unwrap().len(), 1);
    f.service.refresh(&second_tokens.refresh_token, None).await.unwrap();
}

#[tokio::test]
async fn test_terminate_checks_ownership() {
    let f = fixture().await;
    let alice = create_account(&f.accounts, "alice").await;
    let bob = create_account(&f.accounts, "bob").await;
    let (_, session) = f.service.start_session(&alice, None).await.unwrap();

    let err = f.service.terminate(session.id, bob.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::Forbidden)));
    assert!(f.sessions.find_by_id(session.id).await.unwrap().is_some());

    let err = f.service.terminate(Uuid::new_v4(), alice.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Session(SessionError::NotFound)));
}

#[tokio::test]
async fn test_terminate_all() {
    let f = fixture().await;
    let alice = create_account(&f.accounts, "alice").await;
    let bob = create_account(&f.accounts, "bob").await;
    f.service.start_session(&alice, None).await.unwrap();
    f.service.start_session(&alice, None).await.unwrap();
    let (bob_tokens, _) = f.service.start_session(&bob, None).await.unwrap();

    assert_eq!(f.service.terminate_all(alice.id).await.unwrap(), 2);
    assert!(f.service.list_sessions(alice.id).await.unwrap().is_empty());
    f.service.refresh(&bob_tokens.refresh_token, None).await.unwrap();
}

#[tokio::test]
async fn test_list_sessions_hides_expired() {
    let f = fixture().await;
    let account = create_account(&f.accounts, "alice").await;
    f.service.start_session(&account, None).await.unwrap();
    f.sessions
        .create(Session::new(account.id, "stale".into(), Utc::now() - Duration::hours(1), None))
        .await
        .unwrap();

    assert_eq!(f.service.list_sessions(account.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_purge_expired_is_idempotent() {
    let f = fixture().await;
    let account = create_account(&f.accounts, "alice").await;
    f.service.start_session(&account, None).await.unwrap();
    f.sessions
        .create(Session::new(account.id, "stale".into(), Utc::now() - Duration::hours(1), None))
        .await
        .unwrap();

    assert_eq!(f.service.purge_expired().await.unwrap(), 1);
    assert_eq!(f.service.purge_expired().await.unwrap(), 0);
    assert_eq!(f.sessions.count().await, 1);
}
