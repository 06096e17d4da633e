//! Error types for credentials, tokens, sessions and input validation
//!
//! Messages here are safe to show to API clients. In particular
//! `AuthError::InvalidCredentials` never says which half of the credential
//! pair was wrong.

use std::fmt;

use thiserror::Error;

/// Which unique account attribute collided during registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateField {
    Email,
    Nickname,
}

impl DuplicateField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicateField::Email => "email",
            DuplicateField::Nickname => "nickname",
        }
    }
}

impl fmt::Display for DuplicateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authentication and account errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("An account with this {field} already exists")]
    DuplicateAccount { field: DuplicateField },

    #[error("Forbidden")]
    Forbidden,

    #[error("Registration is currently disabled")]
    RegistrationDisabled,

    /// Registration failed after the account row was written and the
    /// compensating delete failed too. Both causes are kept.
    #[error("Registration failed ({cause}) and the account could not be rolled back ({rollback})")]
    RegistrationRollbackFailed { cause: String, rollback: String },
}

/// Token errors
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token is malformed")]
    Malformed,

    #[error("Token signature verification failed")]
    SignatureInvalid,

    #[error("Token expired")]
    Expired,

    #[error("Token type not accepted here")]
    UnexpectedType,

    #[error("Token generation failed")]
    GenerationFailed,

    #[error("Signing key generation failed")]
    KeyGenerationFailed,

    #[error("Stored signing key is unusable: {message}")]
    KeyDecodeFailed { message: String },
}

/// Session lifecycle errors
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session not found")]
    NotFound,

    #[error("Session expired")]
    Expired,
}

/// Input validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Field required: {field}")]
    RequiredField { field: String },

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Nickname must be {min}-{max} characters of letters, digits, '_', '.' or '-'")]
    InvalidNickname { min: usize, max: usize },

    #[error("Password must be between {min} and {max} characters")]
    InvalidPassword { min: usize, max: usize },

    #[error("Unknown role: {role}")]
    UnknownRole { role: String },
}
