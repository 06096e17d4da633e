use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use ks_core::repositories::{
    AccountRepository, DeviceRepository, SessionRepository, SigningKeyRepository,
};

use crate::dto::RefreshTokenRequest;
use crate::handlers::{handle_domain_error, handle_validation_errors};
use crate::routes::{device_context, AppState};

/// Handler for POST /api/v1/auth/refresh
///
/// Exchanges a refresh token for a new pair. The presented token is
/// consumed; presenting it again fails.
///
/// # Request Body
///
/// ```json
/// {
///     "refresh_token": "eyJ..."
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Unknown, reused or expired refresh token
/// - 403 Forbidden: Token subject does not own the session
pub async fn refresh_token<A, S, K, D>(
    req: HttpRequest,
    state: web::Data<AppState<A, S, K, D>>,
    request: web::Json<RefreshTokenRequest>,
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

    let device = device_context(&req, None);

    match state
        .auth_service
        .refresh_token(&request.refresh_token, &device)
        .await
    {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(error) => handle_domain_error(error),
    }
}
