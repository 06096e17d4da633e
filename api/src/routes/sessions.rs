//! Session management for the authenticated account

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use ks_core::repositories::{
    AccountRepository, DeviceRepository, SessionRepository, SigningKeyRepository,
};

use crate::dto::{SessionListResponse, SessionView, TerminateAllResponse};
use crate::handlers::handle_domain_error;
use crate::middleware::AuthContext;
use crate::routes::AppState;

/// Handler for GET /api/v1/sessions
///
/// Live sessions of the caller, newest first.
pub async fn list_sessions<A, S, K, D>(
    state: web::Data<AppState<A, S, K, D>>,
    auth: AuthContext,
) -> HttpResponse
where
    A: AccountRepository + 'static,
    S: SessionRepository + 'static,
    K: SigningKeyRepository + 'static,
    D: DeviceRepository + 'static,
{
    match state.auth_service.list_sessions(auth.account_id).await {
        Ok(sessions) => HttpResponse::Ok().json(SessionListResponse {
            sessions: sessions.into_iter().map(SessionView::from).collect(),
        }),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for DELETE /api/v1/sessions/{id}
///
/// ## Errors
/// - 401 Unauthorized: No such session
/// - 403 Forbidden: Session belongs to another account
pub async fn terminate_session<A, S, K, D>(
    state: web::Data<AppState<A, S, K, D>>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> HttpResponse
where
    A: AccountRepository + 'static,
    S: SessionRepository + 'static,
    K: SigningKeyRepository + 'static,
    D: DeviceRepository + 'static,
{
    let session_id = path.into_inner();
    match state
        .auth_service
        .terminate_session(session_id, auth.account_id)
        .await
    {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for DELETE /api/v1/sessions
///
/// Signs the caller out everywhere.
pub async fn terminate_all_sessions<A, S, K, D>(
    state: web::Data<AppState<A, S, K, D>>,
    auth: AuthContext,
) -> HttpResponse
where
    A: AccountRepository + 'static,
    S: SessionRepository + 'static,
    K: SigningKeyRepository + 'static,
    D: DeviceRepository + 'static,
{
    match state
        .auth_service
        .terminate_all_sessions(auth.account_id)
        .await
    {
        Ok(terminated) => HttpResponse::Ok().json(TerminateAllResponse { terminated }),
        Err(error) => handle_domain_error(error),
    }
}
