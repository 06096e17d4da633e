//! Application state and factory
//!
//! This module wires the route table and provides the factory for creating
//! the Actix-web application.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, HttpResponse,
};
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

use ks_core::repositories::{
    AccountRepository, DeviceRepository, SessionRepository, SigningKeyRepository,
};
use ks_core::services::AuthService;
use ks_shared::{error_codes, ErrorResponse};

use crate::middleware::{AccessTokenVerifier, JwtAuth};
use crate::routes::{admin, auth, health::health_check, sessions, AppState};

/// Create and configure the application with all dependencies
pub fn create_app<A, S, K, D>(
    auth_service: Arc<AuthService<A, S, K, D>>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    A: AccountRepository + 'static,
    S: SessionRepository + 'static,
    K: SigningKeyRepository + 'static,
    D: DeviceRepository + 'static,
{
    let verifier: Arc<dyn AccessTokenVerifier> = auth_service.clone();

    App::new()
        .app_data(web::Data::new(AppState::new(auth_service)))
        .app_data(web::Data::new(verifier))
        .app_data(json_config())
        .wrap(TracingLogger::default())
        .configure(configure_routes::<A, S, K, D>)
        .default_service(web::route().to(not_found))
}

/// Route table
pub fn configure_routes<A, S, K, D>(cfg: &mut web::ServiceConfig)
where
    A: AccountRepository + 'static,
    S: SessionRepository + 'static,
    K: SigningKeyRepository + 'static,
    D: DeviceRepository + 'static,
{
    cfg.route("/health", web::get().to(health_check)).service(
        web::scope("/api/v1")
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register::<A, S, K, D>))
                    .route("/login", web::post().to(auth::login::<A, S, K, D>))
                    .route("/refresh", web::post().to(auth::refresh_token::<A, S, K, D>))
                    .route("/logout", web::post().to(auth::logout::<A, S, K, D>))
                    .route("/public-key", web::get().to(auth::public_key::<A, S, K, D>))
                    .service(
                        web::resource("/validate")
                            .wrap(JwtAuth::new())
                            .route(web::get().to(auth::validate_token)),
                    ),
            )
            .service(
                web::scope("/sessions")
                    .wrap(JwtAuth::new())
                    .route("", web::get().to(sessions::list_sessions::<A, S, K, D>))
                    .route(
                        "",
                        web::delete().to(sessions::terminate_all_sessions::<A, S, K, D>),
                    )
                    .route(
                        "/{id}",
                        web::delete().to(sessions::terminate_session::<A, S, K, D>),
                    ),
            )
            .service(
                web::scope("/admin")
                    .wrap(JwtAuth::new())
                    .route("/keys/rotate", web::post().to(admin::rotate_keys::<A, S, K, D>)),
            ),
    );
}

/// Malformed JSON bodies get the standard error envelope
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(ErrorResponse::new(
            error_codes::BAD_REQUEST,
            err.to_string(),
        ));
        actix_web::error::InternalError::from_response(err, response).into()
    })
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
