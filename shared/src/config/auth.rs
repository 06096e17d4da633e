//! Authentication and session configuration

use serde::{Deserialize, Serialize};

use super::{env_opt, env_or};

/// Signed token configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenConfig {
    /// Value written to and required in the `iss` claim
    pub issuer: String,

    /// Access token lifetime in seconds
    pub access_token_ttl_secs: i64,

    /// Refresh token (and session) lifetime in seconds
    pub refresh_token_ttl_secs: i64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            issuer: String::from("keystone"),
            access_token_ttl_secs: 900,     // 15 minutes
            refresh_token_ttl_secs: 604800, // 7 days
        }
    }
}

impl TokenConfig {
    /// Set access token lifetime in minutes
    pub fn with_access_ttl_minutes(mut self, minutes: i64) -> Self {
        self.access_token_ttl_secs = minutes * 60;
        self
    }

    /// Set refresh token lifetime in days
    pub fn with_refresh_ttl_days(mut self, days: i64) -> Self {
        self.refresh_token_ttl_secs = days * 86400;
        self
    }
}

/// Password hashing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PasswordConfig {
    /// bcrypt cost factor (4..=31)
    pub bcrypt_cost: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self { bcrypt_cost: 12 }
    }
}

/// Session housekeeping configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// How often expired sessions are purged, in seconds
    pub purge_interval_secs: u64,

    /// Whether the background purge task runs at all
    pub purge_enabled: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            purge_interval_secs: 3600,
            purge_enabled: true,
        }
    }
}

/// Account registration configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegistrationConfig {
    /// Whether new accounts may be created
    pub allow_registration: bool,

    /// Role assigned to every new account
    pub default_role: String,

    /// Downstream service notified after an account is created
    #[serde(default)]
    pub hook_url: Option<String>,

    /// Timeout for the downstream notification, in seconds
    pub hook_timeout_secs: u64,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            allow_registration: true,
            default_role: String::from("user"),
            hook_url: None,
            hook_timeout_secs: 5,
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Token configuration
    pub token: TokenConfig,

    /// Password hashing configuration
    #[serde(default)]
    pub password: PasswordConfig,

    /// Session configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Registration configuration
    #[serde(default)]
    pub registration: RegistrationConfig,
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let token_defaults = TokenConfig::default();
        let password_defaults = PasswordConfig::default();
        let session_defaults = SessionConfig::default();
        let registration_defaults = RegistrationConfig::default();

        Self {
            token: TokenConfig {
                issuer: env_opt("JWT_ISSUER").unwrap_or(token_defaults.issuer),
                access_token_ttl_secs: env_or(
                    "ACCESS_TOKEN_TTL_SECS",
                    token_defaults.access_token_ttl_secs,
                ),
                refresh_token_ttl_secs: env_or(
                    "REFRESH_TOKEN_TTL_SECS",
                    token_defaults.refresh_token_ttl_secs,
                ),
            },
            password: PasswordConfig {
                bcrypt_cost: env_or("BCRYPT_COST", password_defaults.bcrypt_cost),
            },
            session: SessionConfig {
                purge_interval_secs: env_or(
                    "SESSION_PURGE_INTERVAL_SECS",
                    session_defaults.purge_interval_secs,
                ),
                purge_enabled: env_or("SESSION_PURGE_ENABLED", session_defaults.purge_enabled),
            },
            registration: RegistrationConfig {
                allow_registration: env_or(
                    "ALLOW_REGISTRATION",
                    registration_defaults.allow_registration,
                ),
                default_role: env_opt("DEFAULT_ROLE").unwrap_or(registration_defaults.default_role),
                hook_url: env_opt("REGISTRATION_HOOK_URL"),
                hook_timeout_secs: env_or(
                    "REGISTRATION_HOOK_TIMEOUT_SECS",
                    registration_defaults.hook_timeout_secs,
                ),
            },
        }
    }
}
