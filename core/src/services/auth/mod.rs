//! Authentication service module
//!
//! This module provides the credential flow:
//! - Account registration with compensating rollback
//! - Login by email or nickname
//! - Token refresh, logout and access-token validation
//! - Session management and signing key rotation

mod config;
mod hooks;
mod password;
mod service;


pub use config::AuthServiceConfig;
pub use hooks::{NoOpRegistrationHook, RegistrationHook};
pub use password::PasswordHasher;
pub use service::AuthService;
