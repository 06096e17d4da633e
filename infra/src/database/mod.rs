//! Database module - MySQL implementations using SQLx
//!
//! This module provides:
//! - Connection pool management and embedded migrations
//! - Repository implementations for accounts, sessions, signing keys,
//!   devices and login history

pub mod connection;
pub mod mysql;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use connection::DatabasePool;
pub use mysql::{
    MySqlAccountRepository, MySqlDeviceRepository, MySqlLoginHistoryRepository,
    MySqlSessionRepository, MySqlSigningKeyRepository,
};
