//! Main authentication service implementation

use std::sync::Arc;

use chrono::Utc;
use ks_shared::validation::{
    is_email_identifier, is_valid_email, is_valid_nickname, is_valid_password, normalize_email,
    MAX_NICKNAME_LENGTH, MAX_PASSWORD_LENGTH, MIN_NICKNAME_LENGTH, MIN_PASSWORD_LENGTH,
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::entities::{Account, DeviceUpsert, LoginRecord, NewAccount, Session};
use crate::domain::value_objects::{AuthResponse, DeviceContext, ValidatedToken};
use crate::errors::{AuthError, DomainError, DomainResult, DuplicateField, ValidationError};
use crate::repositories::{
    AccountRepository, DeviceRepository, LoginHistoryRepository, NoOpLoginHistoryRepository,
    SessionRepository, SigningKeyRepository,
};
use crate::services::session::SessionService;
use crate::services::token::TokenService;

use super::config::AuthServiceConfig;
use super::hooks::{NoOpRegistrationHook, RegistrationHook};
use super::password::PasswordHasher;

/// Authentication service tying credentials, tokens and sessions together
pub struct AuthService<A, S, K, D>
where
    A: AccountRepository,
    S: SessionRepository,
    K: SigningKeyRepository,
    D: DeviceRepository,
{
    /// Account repository for identity lookups and writes
    accounts: Arc<A>,
    /// Device bookkeeping, written on every login
    devices: Arc<D>,
    /// Session lifecycle manager
    sessions: Arc<SessionService<S, A, K>>,
    /// Token engine
    tokens: Arc<TokenService<K>>,
    passwords: PasswordHasher,
    /// Fire-and-forget login history sink
    login_history: Arc<dyn LoginHistoryRepository>,
    /// Downstream step run before a registration is considered complete
    registration_hook: Arc<dyn RegistrationHook>,
    config: AuthServiceConfig,
}

impl<A, S, K, D> AuthService<A, S, K, D>
where
    A: AccountRepository,
    S: SessionRepository,
    K: SigningKeyRepository,
    D: DeviceRepository,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `accounts` - Repository for account persistence
    /// * `devices` - Repository for device bookkeeping
    /// * `sessions` - Session lifecycle manager
    /// * `config` - Service configuration
    ///
    /// Login history and the registration hook default to no-ops; see
    /// [`AuthService::with_login_history`] and
    /// [`AuthService::with_registration_hook`].
    pub fn new(
        accounts: Arc<A>,
        devices: Arc<D>,
        sessions: Arc<SessionService<S, A, K>>,
        config: AuthServiceConfig,
    ) -> DomainResult<Self> {
        let tokens = sessions.token_service().clone();
        Ok(Self {
            accounts,
            devices,
            sessions,
            tokens,
            passwords: PasswordHasher::new(config.bcrypt_cost)?,
            login_history: Arc::new(NoOpLoginHistoryRepository::new()),
            registration_hook: Arc::new(NoOpRegistrationHook),
            config,
        })
    }

    pub fn with_login_history(mut self, login_history: Arc<dyn LoginHistoryRepository>) -> Self {
        self.login_history = login_history;
        self
    }

    pub fn with_registration_hook(mut self, hook: Arc<dyn RegistrationHook>) -> Self {
        self.registration_hook = hook;
        self
    }

    /// Register a new account and open its first session
    ///
    /// This method:
    /// 1. Validates the email, nickname and password
    /// 2. Rejects an email or nickname that is already taken
    /// 3. Hashes the password and stores the account
    /// 4. Grants the default role and runs the registration hook
    /// 5. Issues a token pair and creates a session
    ///
    /// If any step after the account row exists fails, the account is
    /// deleted again. If that delete fails too, both causes are returned in
    /// `AuthError::RegistrationRollbackFailed`.
    pub async fn register(
        &self,
        email: &str,
        nickname: &str,
        password: &str,
        device: &DeviceContext,
    ) -> DomainResult<AuthResponse> {
        if !self.config.allow_registration {
            return Err(AuthError::RegistrationDisabled.into());
        }

        let email = normalize_email(email);
        let nickname = nickname.trim();
        validate_registration(&email, nickname, password)?;

        if self.accounts.exists_by_email(&email).await? {
            return Err(AuthError::DuplicateAccount {
                field: DuplicateField::Email,
            }
            .into());
        }
        if self.accounts.exists_by_nickname(nickname).await? {
            return Err(AuthError::DuplicateAccount {
                field: DuplicateField::Nickname,
            }
            .into());
        }

        let password_hash = self.passwords.hash(password).await?;
        let account = self
            .accounts
            .create(NewAccount {
                email,
                nickname: nickname.to_string(),
                password_hash,
            })
            .await?;

        match self.complete_registration(account.id, device).await {
            Ok(response) => {
                info!(account_id = account.id, "Account registered");
                Ok(response)
            }
            Err(cause) => Err(self.roll_back_registration(account.id, cause).await),
        }
    }

    async fn complete_registration(
        &self,
        account_id: i64,
        device: &DeviceContext,
    ) -> DomainResult<AuthResponse> {
        self.accounts
            .assign_role(account_id, self.config.default_role)
            .await?;

        let account = self.reload_account(account_id).await?;
        self.registration_hook
            .on_account_created(&account.summary())
            .await?;

        let (tokens, session) = self
            .sessions
            .start_session(&account, device.ip.clone())
            .await?;

        Ok(AuthResponse::from_tokens(tokens, session.id, account.summary()))
    }

    async fn roll_back_registration(&self, account_id: i64, cause: DomainError) -> DomainError {
        match self.accounts.delete(account_id).await {
            Ok(_) => {
                warn!(account_id, error = %cause, "Registration failed; account rolled back");
                cause
            }
            Err(rollback) => {
                error!(
                    account_id,
                    error = %cause,
                    rollback_error = %rollback,
                    "Registration failed and the account could not be rolled back"
                );
                AuthError::RegistrationRollbackFailed {
                    cause: cause.to_string(),
                    rollback: rollback.to_string(),
                }
                .into()
            }
        }
    }

    /// Authenticate with email or nickname and open a new session
    ///
    /// An identifier containing `@` is looked up as an email, anything else
    /// as a nickname. Unknown identifiers and wrong passwords fail the same
    /// way, `AuthError::InvalidCredentials`.
    pub async fn login(
        &self,
        identifier: &str,
        password: &str,
        device: &DeviceContext,
    ) -> DomainResult<AuthResponse> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "identifier".to_string(),
            }
            .into());
        }
        if password.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "password".to_string(),
            }
            .into());
        }

        let found = if is_email_identifier(identifier) {
            self.accounts
                .find_by_email(&normalize_email(identifier))
                .await?
        } else {
            self.accounts.find_by_nickname(identifier).await?
        };

        let verified = self
            .passwords
            .verify(password, found.as_ref().map(|a| a.password_hash.as_str()))
            .await?;

        let mut account = match found {
            Some(account) if verified => account,
            _ => {
                info!("Login rejected: invalid credentials");
                return Err(AuthError::InvalidCredentials.into());
            }
        };
        account.roles = self.accounts.find_roles(account.id).await?;

        let tokens = self.tokens.issue_default_pair(account.id, &account.roles)?;

        let fingerprint = device.fingerprint();
        self.devices
            .upsert(DeviceUpsert {
                account_id: account.id,
                fingerprint: fingerprint.clone(),
                user_agent: device.user_agent.clone(),
                ip: device.ip.clone(),
            })
            .await?;

        let session = self
            .sessions
            .create_session(account.id, &tokens, device.ip.clone())
            .await?;

        self.record_login(&account, &session, fingerprint, device)
            .await;

        info!(account_id = account.id, session_id = %session.id, "Login succeeded");
        Ok(AuthResponse::from_tokens(tokens, session.id, account.summary()))
    }

    /// Best-effort; a failed write is logged and otherwise ignored
    async fn record_login(
        &self,
        account: &Account,
        session: &Session,
        fingerprint: String,
        device: &DeviceContext,
    ) {
        let entry = LoginRecord {
            account_id: account.id,
            session_id: session.id,
            device_fingerprint: Some(fingerprint),
            ip: device.ip.clone(),
            user_agent: device.user_agent.clone(),
            logged_in_at: Utc::now(),
        };

        if let Err(e) = self.login_history.record(&entry).await {
            warn!(account_id = account.id, error = %e, "Failed to record login history");
        }
    }

    /// Exchange a refresh token for a new pair; the old token stops working
    pub async fn refresh_token(
        &self,
        refresh_token: &str,
        device: &DeviceContext,
    ) -> DomainResult<AuthResponse> {
        let outcome = self
            .sessions
            .refresh(refresh_token, device.ip.clone())
            .await?;

        Ok(AuthResponse::from_tokens(
            outcome.tokens,
            outcome.session.id,
            outcome.account.summary(),
        ))
    }

    /// End the session holding `refresh_token`
    pub async fn logout(&self, refresh_token: &str) -> DomainResult<()> {
        self.sessions.logout(refresh_token).await
    }

    /// Validate an access token presented on a protected request
    pub fn validate_token(&self, token: &str) -> DomainResult<ValidatedToken> {
        let claims = self.tokens.validate_access_token(token)?;
        Ok(ValidatedToken {
            account_id: claims.account_id()?,
            roles: claims.roles,
            expires_at: claims.exp,
        })
    }

    /// Raw public key of the active signing pair
    pub fn public_key(&self) -> Vec<u8> {
        self.tokens.public_key()
    }

    pub fn public_key_pem(&self) -> String {
        self.tokens.public_key_pem()
    }

    pub async fn list_sessions(&self, account_id: i64) -> DomainResult<Vec<Session>> {
        self.sessions.list_sessions(account_id).await
    }

    pub async fn terminate_session(&self, session_id: Uuid, account_id: i64) -> DomainResult<()> {
        self.sessions.terminate(session_id, account_id).await
    }

    pub async fn terminate_all_sessions(&self, account_id: i64) -> DomainResult<usize> {
        self.sessions.terminate_all(account_id).await
    }

    /// Replace the signing key pair. Every outstanding token stops verifying.
    pub async fn rotate_signing_keys(&self) -> DomainResult<i64> {
        self.tokens.regenerate_keys().await
    }

    async fn reload_account(&self, account_id: i64) -> DomainResult<Account> {
        let mut account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| DomainError::Internal {
                message: format!("account {} disappeared", account_id),
            })?;
        account.roles = self.accounts.find_roles(account_id).await?;
        Ok(account)
    }
}

fn validate_registration(email: &str, nickname: &str, password: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::RequiredField {
            field: "email".to_string(),
        });
    }
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    if !is_valid_nickname(nickname) {
        return Err(ValidationError::InvalidNickname {
            min: MIN_NICKNAME_LENGTH,
            max: MAX_NICKNAME_LENGTH,
        });
    }
    if !is_valid_password(password) {
        return Err(ValidationError::InvalidPassword {
            min: MIN_PASSWORD_LENGTH,
            max: MAX_PASSWORD_LENGTH,
        });
    }
    Ok(())
}
