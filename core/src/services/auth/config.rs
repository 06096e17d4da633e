//! Configuration for the authentication service

use ks_shared::AuthConfig;

use crate::domain::entities::Role;
use crate::errors::ValidationError;

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Whether to allow registration of new accounts
    pub allow_registration: bool,
    /// Role granted to every new account
    pub default_role: Role,
    /// bcrypt cost factor
    pub bcrypt_cost: u32,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            allow_registration: true,
            default_role: Role::User,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl TryFrom<&AuthConfig> for AuthServiceConfig {
    type Error = ValidationError;

    fn try_from(config: &AuthConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            allow_registration: config.registration.allow_registration,
            default_role: config.registration.default_role.parse()?,
            bcrypt_cost: config.password.bcrypt_cost,
        })
    }
}
