//! MySQL implementation of the LoginHistoryRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use ks_core::domain::entities::LoginRecord;
use ks_core::errors::DomainError;
use ks_core::repositories::LoginHistoryRepository;

/// MySQL implementation of LoginHistoryRepository
pub struct MySqlLoginHistoryRepository {
    pool: MySqlPool,
}

impl MySqlLoginHistoryRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn row_to_record(row: &sqlx::mysql::MySqlRow) -> Result<LoginRecord, DomainError> {
    let decode = |e: sqlx::Error| DomainError::store("decode login record", e);
    let session_id: String = row.try_get("session_id").map_err(decode)?;

    Ok(LoginRecord {
        account_id: row.try_get("account_id").map_err(decode)?,
        session_id: Uuid::parse_str(&session_id)
            .map_err(|e| DomainError::store("decode login record", e))?,
        device_fingerprint: row.try_get("device_fingerprint").map_err(decode)?,
        ip: row.try_get("ip").map_err(decode)?,
        user_agent: row.try_get("user_agent").map_err(decode)?,
        logged_in_at: row
            .try_get::<DateTime<Utc>, _>("logged_in_at")
            .map_err(decode)?,
    })
}

#[async_trait]
impl LoginHistoryRepository for MySqlLoginHistoryRepository {
    async fn record(&self, entry: &LoginRecord) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO login_history
                (account_id, session_id, device_fingerprint, ip, user_agent, logged_in_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.account_id)
        .bind(entry.session_id.to_string())
        .bind(&entry.device_fingerprint)
        .bind(&entry.ip)
        .bind(&entry.user_agent)
        .bind(entry.logged_in_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::store("record login", e))?;

        Ok(())
    }

    async fn find_by_account(
        &self,
        account_id: i64,
        limit: usize,
    ) -> Result<Vec<LoginRecord>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT account_id, session_id, device_fingerprint, ip, user_agent, logged_in_at
            FROM login_history
            WHERE account_id = ?
            ORDER BY logged_in_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(account_id)
        .bind(limit as u64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::store("load login history", e))?;

        rows.iter().map(row_to_record).collect()
    }
}
