use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use ks_core::repositories::{
    AccountRepository, DeviceRepository, SessionRepository, SigningKeyRepository,
};

use crate::dto::RegisterRequest;
use crate::handlers::{handle_domain_error, handle_validation_errors};
use crate::routes::{device_context, AppState};

/// Handler for POST /api/v1/auth/register
///
/// Creates an account and its first session.
///
/// # Request Body
///
/// ```json
/// {
///     "email": "alice@example.com",
///     "nickname": "alice",
///     "password": "correct horse battery"
/// }
/// ```
///
/// ## Success (201 Created)
/// Token pair, session ID and the account summary.
///
/// ## Errors
/// - 400 Bad Request: Invalid email, nickname or password
/// - 403 Forbidden: Registration disabled
/// - 409 Conflict: Email or nickname already taken
pub async fn register<A, S, K, D>(
    req: HttpRequest,
    state: web::Data<AppState<A, S, K, D>>,
    request: web::Json<RegisterRequest>,
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
        .register(&request.email, &request.nickname, &request.password, &device)
        .await
    {
        Ok(response) => HttpResponse::Created().json(response),
        Err(error) => handle_domain_error(error),
    }
}
