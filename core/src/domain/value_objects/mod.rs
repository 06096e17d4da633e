//! Value objects handed across the service boundary.

pub mod auth_response;
pub mod device_context;

pub use auth_response::{AccountSummary, AuthResponse, ValidatedToken};
pub use device_context::DeviceContext;
