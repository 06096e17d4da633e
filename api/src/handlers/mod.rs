//! Response helpers shared by all route handlers

pub mod error_handler;

pub use error_handler::{handle_domain_error, handle_validation_errors};
