use actix_web::HttpServer;
use anyhow::Context;
use std::sync::Arc;
use tracing::info;

use ks_api::{create_app, telemetry};
use ks_core::services::{
    AuthService, AuthServiceConfig, SessionCleanupConfig, SessionCleanupService, SessionService,
    TokenService, TokenServiceConfig,
};
use ks_infra::{
    DatabasePool, HttpRegistrationHook, MySqlAccountRepository, MySqlDeviceRepository,
    MySqlLoginHistoryRepository, MySqlSessionRepository, MySqlSigningKeyRepository,
};
use ks_shared::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    telemetry::init_tracing(&config.logging);

    info!(environment = %config.environment, "Starting Keystone API server");

    let database = DatabasePool::new(config.database.clone())
        .await
        .context("failed to initialise database")?;
    if !database
        .health_check()
        .await
        .context("database health check failed")?
    {
        anyhow::bail!("database health check returned an unexpected value");
    }
    let pool = database.get_pool().clone();

    let accounts = Arc::new(MySqlAccountRepository::new(pool.clone()));
    let sessions = Arc::new(MySqlSessionRepository::new(pool.clone()));
    let signing_keys = Arc::new(MySqlSigningKeyRepository::new(pool.clone()));
    let devices = Arc::new(MySqlDeviceRepository::new(pool.clone()));
    let login_history = Arc::new(MySqlLoginHistoryRepository::new(pool));

    let token_service = Arc::new(
        TokenService::new(
            signing_keys,
            TokenServiceConfig::from(&config.auth.token),
        )
        .await
        .context("failed to load signing keys")?,
    );

    let session_service = Arc::new(SessionService::new(
        sessions,
        accounts.clone(),
        token_service,
    ));

    let auth_config = AuthServiceConfig::try_from(&config.auth)
        .context("invalid authentication configuration")?;
    let mut auth_service = AuthService::new(accounts, devices, session_service.clone(), auth_config)
        .context("failed to build auth service")?
        .with_login_history(login_history);

    if let Some(hook) = HttpRegistrationHook::from_config(&config.auth.registration)
        .context("invalid registration hook configuration")?
    {
        auth_service = auth_service.with_registration_hook(Arc::new(hook));
    }
    let auth_service = Arc::new(auth_service);

    let cleanup = Arc::new(SessionCleanupService::new(
        session_service,
        SessionCleanupConfig::from(&config.auth.session),
    ));
    let cleanup_task = cleanup.start_background_task();

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || create_app(auth_service.clone()));
    if let Some(workers) = config.server.workers {
        server = server.workers(workers);
    }
    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    if let Some(task) = cleanup_task {
        task.abort();
    }
    database.close().await;
    info!("Keystone API server stopped");
    Ok(())
}
