//! Bearer token authentication middleware for protecting API endpoints.
//!
//! The middleware extracts the access token from the Authorization header,
//! validates it with the [`AccessTokenVerifier`] registered as app data and
//! injects an [`AuthContext`] into the request.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
};

use ks_core::domain::entities::{has_role, Role};
use ks_core::domain::value_objects::ValidatedToken;
use ks_core::errors::{AuthError, DomainError, DomainResult};
use ks_core::repositories::{
    AccountRepository, DeviceRepository, SessionRepository, SigningKeyRepository,
};
use ks_core::services::AuthService;

use crate::handlers::error_handler::{handle_domain_error, unauthorized};

/// Object-safe view of access token validation
pub trait AccessTokenVerifier: Send + Sync {
    fn validate_access_token(&self, token: &str) -> DomainResult<ValidatedToken>;
}

impl<A, S, K, D> AccessTokenVerifier for AuthService<A, S, K, D>
where
    A: AccountRepository,
    S: SessionRepository,
    K: SigningKeyRepository,
    D: DeviceRepository,
{
    fn validate_access_token(&self, token: &str) -> DomainResult<ValidatedToken> {
        self.validate_token(token)
    }
}

/// Authenticated caller injected into requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub account_id: i64,
    pub roles: Vec<Role>,
    /// Access token expiry (epoch seconds)
    pub expires_at: i64,
}

impl AuthContext {
    pub fn has_role(&self, role: Role) -> bool {
        has_role(&self.roles, role)
    }

    /// `Forbidden` unless the caller holds `role`
    pub fn require_role(&self, role: Role) -> DomainResult<()> {
        if self.has_role(role) {
            Ok(())
        } else {
            Err(DomainError::Auth(AuthError::Forbidden))
        }
    }
}

impl From<ValidatedToken> for AuthContext {
    fn from(token: ValidatedToken) -> Self {
        Self {
            account_id: token.account_id,
            roles: token.roles,
            expires_at: token.expires_at,
        }
    }
}

/// Bearer authentication middleware factory
#[derive(Default)]
pub struct JwtAuth;

impl JwtAuth {
    pub fn new() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// Bearer authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_web::dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let token = match extract_bearer_token(&req) {
                Some(token) => token,
                None => {
                    let response = unauthorized("Missing or invalid Authorization header");
                    return Ok(req.into_response(response).map_into_right_body());
                }
            };

            let verifier = match req.app_data::<web::Data<Arc<dyn AccessTokenVerifier>>>() {
                Some(verifier) => verifier.clone(),
                None => {
                    tracing::error!("Access token verifier is not registered");
                    return Err(ErrorUnauthorized("Authentication not configured"));
                }
            };

            match verifier.validate_access_token(&token) {
                Ok(validated) => {
                    req.extensions_mut().insert(AuthContext::from(validated));
                }
                Err(e) => {
                    let response = handle_domain_error(e);
                    return Ok(req.into_response(response).map_into_right_body());
                }
            }

            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ErrorUnauthorized("Authentication required"));

        ready(result)
    }
}
