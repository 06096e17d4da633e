//! MySQL repository implementations

mod account_repository_impl;
mod device_repository_impl;
mod login_history_repository_impl;
mod session_repository_impl;
mod signing_key_repository_impl;

pub use account_repository_impl::MySqlAccountRepository;
pub use device_repository_impl::MySqlDeviceRepository;
pub use login_history_repository_impl::MySqlLoginHistoryRepository;
pub use session_repository_impl::{refresh_token_hash, MySqlSessionRepository};
pub use signing_key_repository_impl::MySqlSigningKeyRepository;
