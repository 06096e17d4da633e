//! Session lifecycle service implementation

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::entities::{Account, IssuedTokens, Session};
use crate::errors::{AuthError, DomainError, SessionError};
use crate::repositories::{AccountRepository, SessionRepository, SigningKeyRepository};
use crate::services::token::TokenService;

/// Result of a successful refresh
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub tokens: IssuedTokens,
    /// The replacement session (new ID)
    pub session: Session,
    /// Account re-read at refresh time, current roles included
    pub account: Account,
}

/// Orchestrates session creation, refresh rotation and revocation
pub struct SessionService<S, A, K>
where
    S: SessionRepository,
    A: AccountRepository,
    K: SigningKeyRepository,
{
    sessions: Arc<S>,
    accounts: Arc<A>,
    tokens: Arc<TokenService<K>>,
}

impl<S, A, K> SessionService<S, A, K>
where
    S: SessionRepository,
    A: AccountRepository,
    K: SigningKeyRepository,
{
    pub fn new(sessions: Arc<S>, accounts: Arc<A>, tokens: Arc<TokenService<K>>) -> Self {
        Self {
            sessions,
            accounts,
            tokens,
        }
    }

    /// Persists a session for a freshly issued pair
    ///
    /// The session expires exactly when `tokens.refresh_token` does.
    pub async fn create_session(
        &self,
        account_id: i64,
        tokens: &IssuedTokens,
        client_ip: Option<String>,
    ) -> Result<Session, DomainError> {
        let session = Session::new(
            account_id,
            tokens.refresh_token.clone(),
            expiry_instant(tokens.refresh_expires_at)?,
            client_ip,
        );
        let session = self.sessions.create(session).await?;

        debug!(session_id = %session.id, account_id, "Session created");
        Ok(session)
    }

    /// Issues a pair for `account` with its current roles and opens a session
    pub async fn start_session(
        &self,
        account: &Account,
        client_ip: Option<String>,
    ) -> Result<(IssuedTokens, Session), DomainError> {
        let tokens = self.tokens.issue_default_pair(account.id, &account.roles)?;
        let session = self.create_session(account.id, &tokens, client_ip).await?;
        Ok((tokens, session))
    }

    /// Exchanges a refresh token for a new pair, rotating the session
    ///
    /// The presented token is single-use: once this succeeds, presenting it
    /// again fails with `SessionError::NotFound`.
    ///
    /// # Errors
    ///
    /// * `SessionError::NotFound` - No session holds the token (logged out,
    ///   already rotated, forged, or account deleted)
    /// * `SessionError::Expired` - The session is past expiry; the row is deleted
    /// * `TokenError::*` - The token fails signature or claims verification
    /// * `AuthError::Forbidden` - The token subject does not own the session
    pub async fn refresh(
        &self,
        refresh_token: &str,
        client_ip: Option<String>,
    ) -> Result<RefreshOutcome, DomainError> {
        let session = self
            .sessions
            .find_by_refresh_token(refresh_token)
            .await?
            .ok_or(SessionError::NotFound)?;

        if session.is_expired() {
            self.sessions.delete(session.id).await?;
            info!(session_id = %session.id, "Removed expired session on refresh");
            return Err(SessionError::Expired.into());
        }

        let claims = self.tokens.verify(refresh_token)?;
        if claims.account_id()? != session.account_id {
            warn!(
                session_id = %session.id,
                subject = %claims.sub,
                "Refresh token subject does not own its session"
            );
            return Err(AuthError::Forbidden.into());
        }

        let account = match self.accounts.find_by_id(session.account_id).await? {
            Some(account) => account,
            None => {
                self.sessions.delete(session.id).await?;
                warn!(session_id = %session.id, "Session outlived its account");
                return Err(SessionError::NotFound.into());
            }
        };

        let tokens = self.tokens.issue_default_pair(account.id, &account.roles)?;
        let replacement = session.rotate(
            tokens.refresh_token.clone(),
            expiry_instant(tokens.refresh_expires_at)?,
            client_ip,
        );

        if !self.sessions.replace(session.id, replacement.clone()).await? {
            // A concurrent refresh with the same token won the race
            return Err(SessionError::NotFound.into());
        }

        info!(
            old_session_id = %session.id,
            session_id = %replacement.id,
            account_id = account.id,
            "Session refreshed"
        );

        Ok(RefreshOutcome {
            tokens,
            session: replacement,
            account,
        })
    }

    /// Ends the session holding `refresh_token`
    ///
    /// A second logout with the same token fails with `SessionError::NotFound`.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), DomainError> {
        if !self.sessions.delete_by_refresh_token(refresh_token).await? {
            return Err(SessionError::NotFound.into());
        }
        debug!("Session logged out");
        Ok(())
    }

    /// Live sessions of an account, newest first
    pub async fn list_sessions(&self, account_id: i64) -> Result<Vec<Session>, DomainError> {
        let now = Utc::now();
        let sessions = self.sessions.find_by_account(account_id).await?;
        Ok(sessions
            .into_iter()
            .filter(|s| !s.is_expired_at(now))
            .collect())
    }

    /// Deletes one session after checking that `account_id` owns it
    pub async fn terminate(&self, session_id: Uuid, account_id: i64) -> Result<(), DomainError> {
        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or(SessionError::NotFound)?;

        if !session.belongs_to(account_id) {
            warn!(%session_id, account_id, "Refusing to terminate another account's session");
            return Err(AuthError::Forbidden.into());
        }

        if !self.sessions.delete(session_id).await? {
            return Err(SessionError::NotFound.into());
        }

        info!(%session_id, account_id, "Session terminated");
        Ok(())
    }

    /// Deletes every session of an account, returning how many were removed
    pub async fn terminate_all(&self, account_id: i64) -> Result<usize, DomainError> {
        let removed = self.sessions.delete_by_account(account_id).await?;
        info!(account_id, removed, "All sessions terminated");
        Ok(removed)
    }

    /// Deletes every session past expiry; zero matches is not an error
    pub async fn purge_expired(&self) -> Result<usize, DomainError> {
        self.sessions.delete_expired(Utc::now()).await
    }

    pub fn token_service(&self) -> &Arc<TokenService<K>> {
        &self.tokens
    }
}

fn expiry_instant(epoch_secs: i64) -> Result<DateTime<Utc>, DomainError> {
    Utc.timestamp_opt(epoch_secs, 0)
        .single()
        .ok_or_else(|| DomainError::Internal {
            message: format!("token expiry {} out of range", epoch_secs),
        })
}
