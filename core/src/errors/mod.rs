//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

// Re-export all error types
pub use types::{AuthError, DuplicateField, SessionError, TokenError, ValidationError};

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug)]
pub enum DomainError {
    /// A backing store (accounts, sessions, keys, devices) could not be
    /// reached or rejected the operation
    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl DomainError {
    /// Wraps a persistence failure with the operation that triggered it
    pub fn store(context: &str, err: impl std::fmt::Display) -> Self {
        DomainError::StoreUnavailable {
            message: format!("{}: {}", context, err),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
