//! Registration hook clients
//!
//! A registration hook is a downstream step that must succeed for a new
//! account to be kept. When no hook URL is configured the core's no-op hook
//! is used instead.

mod http_registration_hook;

pub use http_registration_hook::HttpRegistrationHook;
