//! # Infrastructure Layer
//!
//! Concrete implementations of the repository traits defined in `ks_core`,
//! plus clients for downstream services.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Database**: MySQL implementations using SQLx, with embedded migrations
//! - **Hooks**: HTTP client for the registration hook

/// Database module - MySQL implementations using SQLx
pub mod database;

/// Outbound calls made during the credential flow
pub mod hooks;

pub use database::{
    DatabasePool, MySqlAccountRepository, MySqlDeviceRepository, MySqlLoginHistoryRepository,
    MySqlSessionRepository, MySqlSigningKeyRepository,
};
pub use hooks::HttpRegistrationHook;

use ks_core::errors::DomainError;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        DomainError::StoreUnavailable {
            message: err.to_string(),
        }
    }
}
