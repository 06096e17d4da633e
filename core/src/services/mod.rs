//! Business services containing domain logic and use cases.

pub mod auth;
pub mod session;
pub mod token;

// Re-export commonly used types
pub use auth::{AuthService, AuthServiceConfig, NoOpRegistrationHook, PasswordHasher, RegistrationHook};
pub use session::{PurgeResult, RefreshOutcome, SessionCleanupConfig, SessionCleanupService, SessionService};
pub use token::{KeyMaterial, TokenService, TokenServiceConfig};
