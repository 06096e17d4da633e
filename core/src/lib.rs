//! # Keystone Core
//!
//! Core business logic and domain layer for the Keystone identity backend.
//! This crate contains domain entities, the token engine, the session
//! lifecycle manager, the credential and registration flow, repository
//! interfaces, and the error taxonomy shared by every layer above it.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use errors::{DomainError, DomainResult};
pub use services::{AuthService, SessionService, TokenService};
