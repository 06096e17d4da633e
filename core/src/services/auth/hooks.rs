//! Extension point called while an account is being registered

use async_trait::async_trait;

use crate::domain::value_objects::AccountSummary;
use crate::errors::DomainError;

/// Downstream step that must succeed for a registration to stand
///
/// An error here makes the registration roll back the new account.
#[async_trait]
pub trait RegistrationHook: Send + Sync {
    async fn on_account_created(&self, account: &AccountSummary) -> Result<(), DomainError>;
}

/// Hook used when no downstream service is configured
pub struct NoOpRegistrationHook;

#[async_trait]
impl RegistrationHook for NoOpRegistrationHook {
    async fn on_account_created(&self, _account: &AccountSummary) -> Result<(), DomainError> {
        Ok(())
    }
}
