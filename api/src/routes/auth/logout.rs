use actix_web::{web, HttpResponse};
use validator::Validate;

use ks_core::repositories::{
    AccountRepository, DeviceRepository, SessionRepository, SigningKeyRepository,
};

use crate::dto::{LogoutRequest, LogoutResponse};
use crate::handlers::{handle_domain_error, handle_validation_errors};
use crate::routes::AppState;

/// Handler for POST /api/v1/auth/logout
///
/// Ends the session holding the given refresh token. Access tokens already
/// issued stay valid until they expire.
///
/// ## Errors
/// - 401 Unauthorized: No session holds this token (already logged out)
pub async fn logout<A, S, K, D>(
    state: web::Data<AppState<A, S, K, D>>,
    request: web::Json<LogoutRequest>,
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

    match state.auth_service.logout(&request.refresh_token).await {
        Ok(()) => HttpResponse::Ok().json(LogoutResponse {
            message: "Logged out successfully".to_string(),
        }),
        Err(error) => handle_domain_error(error),
    }
}
