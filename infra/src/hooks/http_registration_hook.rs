//! HTTP registration hook
//!
//! POSTs the public account summary as JSON to a configured URL. Any
//! transport error or non-2xx status fails the hook, which makes the
//! registration roll back.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};

use ks_core::domain::value_objects::AccountSummary;
use ks_core::errors::DomainError;
use ks_core::services::RegistrationHook;
use ks_shared::RegistrationConfig;

use crate::InfrastructureError;

/// Registration hook backed by an HTTP endpoint
#[derive(Debug, Clone)]
pub struct HttpRegistrationHook {
    client: reqwest::Client,
    url: String,
}

impl HttpRegistrationHook {
    /// Create a hook that posts to `url`, giving up after `timeout`
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, InfrastructureError> {
        let url = url.into();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(InfrastructureError::Config(format!(
                "Registration hook URL must be http(s): {}",
                url
            )));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        info!(url = %url, timeout_secs = timeout.as_secs(), "Registration hook initialized");
        Ok(Self { client, url })
    }

    /// Builds the hook from configuration
    ///
    /// # Returns
    /// * `Ok(None)` - No hook URL configured
    /// * `Ok(Some(hook))` - Hook ready to use
    pub fn from_config(config: &RegistrationConfig) -> Result<Option<Self>, InfrastructureError> {
        match &config.hook_url {
            Some(url) => Self::new(url.clone(), Duration::from_secs(config.hook_timeout_secs))
                .map(Some),
            None => Ok(None),
        }
    }

    /// Target URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RegistrationHook for HttpRegistrationHook {
    async fn on_account_created(&self, account: &AccountSummary) -> Result<(), DomainError> {
        debug!(account_id = account.id, "Calling registration hook");

        let response = self
            .client
            .post(&self.url)
            .json(account)
            .send()
            .await
            .map_err(|e| {
                warn!(account_id = account.id, error = %e, "Registration hook unreachable");
                DomainError::store("registration hook", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(account_id = account.id, status = %status, "Registration hook rejected account");
            return Err(DomainError::store(
                "registration hook",
                format!("unexpected status {}", status),
            ));
        }

        Ok(())
    }
}
