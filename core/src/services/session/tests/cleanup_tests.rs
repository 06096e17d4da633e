//! Unit tests for the session cleanup task

use std::sync::Arc;

use chrono::{Duration, Utc};

use super::{create_account, fixture};
use crate::domain::entities::Session;
use crate::repositories::SessionRepository;
use crate::services::session::{PurgeResult, SessionCleanupConfig, SessionCleanupService};

#[tokio::test]
async fn test_run_cleanup_purges_expired() {
    let f = fixture().await;
    let account = create_account(&f.accounts, "alice").await;
    f.service.start_session(&account, None).await.unwrap();
    f.sessions
        .create(Session::new(account.id, "stale".into(), Utc::now() - Duration::minutes(1), None))
        .await
        .unwrap();

    let cleanup = SessionCleanupService::new(f.service.clone(), SessionCleanupConfig::default());
    let result = cleanup.run_cleanup().await.unwrap();

    assert_eq!(result.expired_sessions_deleted, 1);
    assert_eq!(f.sessions.count().await, 1);
}

#[tokio::test]
async fn test_disabled_cleanup_does_nothing() {
    let f = fixture().await;
    let account = create_account(&f.accounts, "alice").await;
    f.sessions
        .create(Session::new(account.id, "stale".into(), Utc::now() - Duration::minutes(1), None))
        .await
        .unwrap();

    let config = SessionCleanupConfig {
        interval_seconds: 60,
        enabled: false,
    };
    let cleanup = Arc::new(SessionCleanupService::new(f.service.clone(), config));

    assert_eq!(cleanup.run_cleanup().await.unwrap(), PurgeResult::default());
    assert!(cleanup.start_background_task().is_none());
    assert_eq!(f.sessions.count().await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_background_task_runs_on_interval() {
    let f = fixture().await;
    let account = create_account(&f.accounts, "alice").await;
    f.sessions
        .create(Session::new(account.id, "stale".into(), Utc::now() - Duration::minutes(1), None))
        .await
        .unwrap();

    let config = SessionCleanupConfig {
        interval_seconds: 60,
        enabled: true,
    };
    let cleanup = Arc::new(SessionCleanupService::new(f.service.clone(), config));
    let handle = cleanup.start_background_task().expect("task started");

    // The first tick fires immediately
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    assert_eq!(f.sessions.count().await, 0);

    handle.abort();
}
