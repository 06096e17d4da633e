//! Request and response bodies of the HTTP API

pub mod auth_dto;
pub mod session_dto;

pub use auth_dto::*;
pub use session_dto::*;
