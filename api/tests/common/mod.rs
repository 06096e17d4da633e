//! Shared setup for HTTP tests: the real route table over in-memory stores

#![allow(dead_code)]

use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::{header, StatusCode},
    test,
};
use actix_http::Request;
use std::sync::Arc;

use ks_core::repositories::{
    InMemoryAccountRepository, InMemoryDeviceRepository, InMemorySessionRepository,
    InMemorySigningKeyRepository,
};
use ks_core::services::{
    AuthService, AuthServiceConfig, SessionService, TokenService, TokenServiceConfig,
};

pub type TestAuthService = AuthService<
    InMemoryAccountRepository,
    InMemorySessionRepository,
    InMemorySigningKeyRepository,
    InMemoryDeviceRepository,
>;

pub struct TestContext {
    pub auth_service: Arc<TestAuthService>,
    pub accounts: InMemoryAccountRepository,
    pub sessions: InMemorySessionRepository,
}

pub async fn test_context(config: AuthServiceConfig) -> TestContext {
    let accounts = InMemoryAccountRepository::new();
    let sessions = InMemorySessionRepository::new();

    let tokens = Arc::new(
        TokenService::new(
            Arc::new(InMemorySigningKeyRepository::new()),
            TokenServiceConfig::default(),
        )
        .await
        .unwrap(),
    );
    let session_service = Arc::new(SessionService::new(
        Arc::new(sessions.clone()),
        Arc::new(accounts.clone()),
        tokens,
    ));
    let auth_service = AuthService::new(
        Arc::new(accounts.clone()),
        Arc::new(InMemoryDeviceRepository::new()),
        session_service,
        config,
    )
    .unwrap();

    TestContext {
        auth_service: Arc::new(auth_service),
        accounts,
        sessions,
    }
}

pub fn fast_config() -> AuthServiceConfig {
    AuthServiceConfig {
        bcrypt_cost: 4,
        ..AuthServiceConfig::default()
    }
}

pub fn register_body(email: &str, nickname: &str) -> serde_json::Value {
    serde_json::json!({
        "email": email,
        "nickname": nickname,
        "password": "correct horse battery",
    })
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// Registers through the API and returns the response body
pub async fn register<S, B>(app: &S, email: &str, nickname: &str) -> serde_json::Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(register_body(email, nickname))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    test::read_body_json(resp).await
}

/// Logs in through the API and returns the response body
pub async fn login<S, B>(app: &S, identifier: &str) -> serde_json::Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(serde_json::json!({
            "identifier": identifier,
            "password": "correct horse battery",
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    test::read_body_json(resp).await
}
