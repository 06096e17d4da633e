//! Login history repository module.

mod r#trait;
pub use r#trait::LoginHistoryRepository;

mod noop;
pub use noop::NoOpLoginHistoryRepository;

mod memory;
pub use memory::InMemoryLoginHistoryRepository;
