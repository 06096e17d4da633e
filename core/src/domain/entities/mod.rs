//! Domain entities representing core business objects.

pub mod account;
pub mod device;
pub mod login_record;
pub mod role;
pub mod session;
pub mod signing_key;
pub mod token;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use account::{Account, NewAccount};
pub use device::{Device, DeviceUpsert};
pub use login_record::LoginRecord;
pub use role::{has_role, Role};
pub use session::Session;
pub use signing_key::{NewSigningKey, SigningKeyPair};
pub use token::{Claims, IssuedTokens, TokenType};
