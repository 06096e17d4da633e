//! Background purge of expired sessions

use std::sync::Arc;
use std::time::Duration;

use ks_shared::SessionConfig;
use tracing::{error, info, warn};

use crate::errors::DomainError;
use crate::repositories::{AccountRepository, SessionRepository, SigningKeyRepository};

use super::service::SessionService;

/// Configuration for the session cleanup task
#[derive(Debug, Clone)]
pub struct SessionCleanupConfig {
    /// How often to purge (in seconds)
    pub interval_seconds: u64,
    /// Whether the background task runs at all
    pub enabled: bool,
}

impl Default for SessionCleanupConfig {
    fn default() -> Self {
        Self::from(&SessionConfig::default())
    }
}

impl From<&SessionConfig> for SessionCleanupConfig {
    fn from(config: &SessionConfig) -> Self {
        Self {
            interval_seconds: config.purge_interval_secs.max(1),
            enabled: config.purge_enabled,
        }
    }
}

/// Periodically deletes sessions that are past expiry
pub struct SessionCleanupService<S, A, K>
where
    S: SessionRepository + 'static,
    A: AccountRepository + 'static,
    K: SigningKeyRepository + 'static,
{
    sessions: Arc<SessionService<S, A, K>>,
    config: SessionCleanupConfig,
}

impl<S, A, K> SessionCleanupService<S, A, K>
where
    S: SessionRepository + 'static,
    A: AccountRepository + 'static,
    K: SigningKeyRepository + 'static,
{
    pub fn new(sessions: Arc<SessionService<S, A, K>>, config: SessionCleanupConfig) -> Self {
        Self { sessions, config }
    }

    /// Run a single purge cycle
    pub async fn run_cleanup(&self) -> Result<PurgeResult, DomainError> {
        if !self.config.enabled {
            return Ok(PurgeResult::default());
        }

        let expired_sessions_deleted = self.sessions.purge_expired().await?;
        if expired_sessions_deleted > 0 {
            info!("Purged {} expired sessions", expired_sessions_deleted);
        }

        Ok(PurgeResult {
            expired_sessions_deleted,
        })
    }

    /// Start the cleanup service as a background task
    ///
    /// Returns `None` when disabled.
    pub fn start_background_task(self: Arc<Self>) -> Option<tokio::task::JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Session cleanup service is disabled");
            return None;
        }

        let interval = Duration::from_secs(self.config.interval_seconds);

        Some(tokio::spawn(async move {
            info!(
                "Session cleanup service started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                if let Err(e) = self.run_cleanup().await {
                    error!("Session cleanup cycle failed: {}", e);
                }
            }
        }))
    }
}

/// Result of a purge cycle
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PurgeResult {
    pub expired_sessions_deleted: usize,
}
