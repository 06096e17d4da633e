//! Token engine
//!
//! This module handles:
//! - Ed25519 signing key lifecycle (load, generate, rotate)
//! - Signing and verification of compact JWS tokens
//! - Access/refresh pair issuance

mod config;
mod key_manager;
mod service;

#[cfg(test)]
mod tests;

pub use config::TokenServiceConfig;
pub use key_manager::KeyMaterial;
pub use service::TokenService;
