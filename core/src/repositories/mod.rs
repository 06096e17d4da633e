pub mod account;
pub mod device;
pub mod login_history;
pub mod session;
pub mod signing_key;

pub use account::{AccountRepository, InMemoryAccountRepository};
pub use device::{DeviceRepository, InMemoryDeviceRepository};
pub use login_history::{
    InMemoryLoginHistoryRepository, LoginHistoryRepository, NoOpLoginHistoryRepository,
};
pub use session::{InMemorySessionRepository, SessionRepository};
pub use signing_key::{InMemorySigningKeyRepository, SigningKeyRepository};
