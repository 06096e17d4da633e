use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use ks_core::repositories::{
    AccountRepository, DeviceRepository, SessionRepository, SigningKeyRepository,
};

use crate::dto::LoginRequest;
use crate::handlers::{handle_domain_error, handle_validation_errors};
use crate::routes::{device_context, AppState};

/// Handler for POST /api/v1/auth/login
///
/// `identifier` is an email when it contains `@`, a nickname otherwise.
///
/// ## Errors
/// - 400 Bad Request: Missing identifier or password
/// - 401 Unauthorized: Invalid credentials (never says which part)
pub async fn login<A, S, K, D>(
    req: HttpRequest,
    state: web::Data<AppState<A, S, K, D>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    A: AccountRepository + 'static,
    S: SessionRepository + 'static,
    K: SigningKeyRepository + 'static,
    D: DeviceRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_errors(errors);
    }

    let request = request.into_inner();
    let device = device_context(&req, request.device_fingerprint);

    match state
        .auth_service
        .login(&request.identifier, &request.password, &device)
        .await
    {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(error) => handle_domain_error(error),
    }
}
