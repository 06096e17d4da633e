//! Authentication route handlers
//!
//! Registration, login, token refresh, logout, access token validation and
//! the public verification key.

pub mod login;
pub mod logout;
pub mod public_key;
pub mod refresh;
pub mod register;
pub mod validate;

pub use login::login;
pub use logout::logout;
pub use public_key::public_key;
pub use refresh::refresh_token;
pub use register::register;
pub use validate::validate_token;
