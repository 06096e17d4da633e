mod cleanup_tests;
mod service_tests;

use std::sync::Arc;

use crate::domain::entities::{Account, NewAccount, Role};
use crate::repositories::{
    AccountRepository, InMemoryAccountRepository, InMemorySessionRepository,
    InMemorySigningKeyRepository,
};
use crate::services::session::SessionService;
use crate::services::token::{TokenService, TokenServiceConfig};

pub(super) type TestSessionService = SessionService<
    InMemorySessionRepository,
    InMemoryAccountRepository,
    InMemorySigningKeyRepository,
>;

pub(super) struct Fixture {
    pub service: Arc<TestSessionService>,
    pub sessions: InMemorySessionRepository,
    pub accounts: InMemoryAccountRepository,
    pub tokens: Arc<TokenService<InMemorySigningKeyRepository>>,
}

pub(super) async fn fixture() -> Fixture {
    let sessions = InMemorySessionRepository::new();
    let accounts = InMemoryAccountRepository::new();
    let tokens = Arc::new(
        TokenService::new(
            Arc::new(InMemorySigningKeyRepository::new()),
            TokenServiceConfig::default(),
        )
        .await
        .unwrap(),
    );
    let service = Arc::new(SessionService::new(
        Arc::new(sessions.clone()),
        Arc::new(accounts.clone()),
        tokens.clone(),
    ));

    Fixture {
        service,
        sessions,
        accounts,
        tokens,
    }
}

pub(super) async fn create_account(accounts: &InMemoryAccountRepository, nickname: &str) -> Account {
    let account = accounts
        .create(NewAccount {
            email: format!("{}@example.com", nickname),
            nickname: nickname.to_string(),
            password_hash: "hash".to_string(),
        })
        .await
        .unwrap();
    accounts.assign_role(account.id, Role::User).await.unwrap();
    accounts.find_by_id(account.id).await.unwrap().unwrap()
}
