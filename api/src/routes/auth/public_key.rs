use actix_web::{web, HttpResponse};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use ks_core::repositories::{
    AccountRepository, DeviceRepository, SessionRepository, SigningKeyRepository,
};

use crate::dto::PublicKeyResponse;
use crate::routes::AppState;

/// Handler for GET /api/v1/auth/public-key
///
/// Lets other services verify access tokens offline.
pub async fn public_key<A, S, K, D>(state: web::Data<AppState<A, S, K, D>>) -> HttpResponse
where
    A: AccountRepository + 'static,
    S: SessionRepository + 'static,
    K: SigningKeyRepository + 'static,
    D: DeviceRepository + 'static,
{
    HttpResponse::Ok().json(PublicKeyResponse {
        algorithm: "EdDSA".to_string(),
        public_key: STANDARD.encode(state.auth_service.public_key()),
        pem: state.auth_service.public_key_pem(),
    })
}
