//! Shared utilities and common types for the Keystone server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - The JSON error envelope returned by the HTTP layer
//! - Input validation helpers for credentials

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, DatabaseConfig, Environment, LoggingConfig, PasswordConfig,
    RegistrationConfig, ServerConfig, SessionConfig, TokenConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use utils::validation;
