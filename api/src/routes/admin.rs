//! Operator endpoints; every handler requires the admin role

use actix_web::{web, HttpResponse};

use ks_core::domain::entities::Role;
use ks_core::repositories::{
    AccountRepository, DeviceRepository, SessionRepository, SigningKeyRepository,
};

use crate::dto::RotateKeysResponse;
use crate::handlers::handle_domain_error;
use crate::middleware::AuthContext;
use crate::routes::AppState;

/// Handler for POST /api/v1/admin/keys/rotate
///
/// Replaces the signing key pair. Every outstanding token, the caller's
/// included, stops verifying.
pub async fn rotate_keys<A, S, K, D>(
    state: web::Data<AppState<A, S, K, D>>,
    auth: AuthContext,
) -> HttpResponse
where
    A: AccountRepository + 'static,
    S: SessionRepository + 'static,
    K: SigningKeyRepository + 'static,
    D: DeviceRepository + 'static,
{
    if let Err(error) = auth.require_role(Role::Admin) {
        return handle_domain_error(error);
    }

    match state.auth_service.rotate_signing_keys().await {
        Ok(key_id) => {
            tracing::warn!(account_id = auth.account_id, key_id, "Signing keys rotated via API");
            HttpResponse::Ok().json(RotateKeysResponse {
                key_id,
                message: "Signing keys rotated; all tokens must be reissued".to_string(),
            })
        }
        Err(error) => handle_domain_error(error),
    }
}
