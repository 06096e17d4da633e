//! Session lifecycle management
//!
//! Sessions are the persisted authority for refresh tokens. This module
//! creates them, rotates them on refresh, revokes them and purges expired
//! rows in the background.

mod cleanup;
mod service;

#[cfg(test)]
mod tests;

pub use cleanup::{PurgeResult, SessionCleanupConfig, SessionCleanupService};
pub use service::{RefreshOutcome, SessionService};
