//! Route handlers
//!
//! Handlers are generic over the repository implementations so the same
//! code serves MySQL in production and the in-memory stores in tests.

pub mod admin;
pub mod auth;
pub mod health;
pub mod sessions;

use actix_web::{http::header::USER_AGENT, HttpRequest};
use std::sync::Arc;

use ks_core::domain::value_objects::DeviceContext;
use ks_core::repositories::{
    AccountRepository, DeviceRepository, SessionRepository, SigningKeyRepository,
};
use ks_core::services::AuthService;

/// Application state that holds shared services
pub struct AppState<A, S, K, D>
where
    A: AccountRepository,
    S: SessionRepository,
    K: SigningKeyRepository,
    D: DeviceRepository,
{
    pub auth_service: Arc<AuthService<A, S, K, D>>,
}

impl<A, S, K, D> AppState<A, S, K, D>
where
    A: AccountRepository,
    S: SessionRepository,
    K: SigningKeyRepository,
    D: DeviceRepository,
{
    pub fn new(auth_service: Arc<AuthService<A, S, K, D>>) -> Self {
        Self { auth_service }
    }
}

/// Client address and user agent of the request, plus an optional
/// client-supplied device fingerprint
pub fn device_context(req: &HttpRequest, fingerprint: Option<String>) -> DeviceContext {
    let ip = req
        .connection_info()
        .realip_remote_addr()
        .map(strip_port);
    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let context = DeviceContext::new(ip, user_agent);
    match fingerprint {
        Some(fp) => context.with_fingerprint(fp),
        None => context,
    }
}

/// `1.2.3.4:5678` → `1.2.3.4`; IPv6 literals keep their brackets stripped
fn strip_port(addr: &str) -> String {
    if let Some(rest) = addr.strip_prefix('[') {
        return rest.split(']').next().unwrap_or(rest).to_string();
    }
    match addr.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') && port.parse::<u16>().is_ok() => {
            host.to_string()
        }
        _ => addr.to_string(),
    }
}
