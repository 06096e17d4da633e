//! MySQL implementation of the SessionRepository trait.
//!
//! Refresh tokens are long, so uniqueness and lookups go through
//! `refresh_token_hash` (hex SHA-256 of the token). The full token is still
//! stored and compared on read.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::types::Json;
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use ks_core::domain::entities::Session;
use ks_core::errors::DomainError;
use ks_core::repositories::SessionRepository;

const SESSION_COLUMNS: &str = "id, account_id, refresh_token, client_ips, expires_at, created_at";

/// Hex SHA-256 of a refresh token, as stored in `sessions.refresh_token_hash`
pub fn refresh_token_hash(refresh_token: &str) -> String {
    hex::encode(Sha256::digest(refresh_token.as_bytes()))
}

/// MySQL implementation of SessionRepository
pub struct MySqlSessionRepository {
    pool: MySqlPool,
}

impl MySqlSessionRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_session(row: &sqlx::mysql::MySqlRow) -> Result<Session, DomainError> {
        let id: String = row.try_get("id").map_err(column_error)?;
        let id = Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
            message: format!("Stored session id is not a UUID: {}", e),
        })?;
        let client_ips: Json<Vec<String>> = row.try_get("client_ips").map_err(column_error)?;

        Ok(Session {
            id,
            account_id: row.try_get("account_id").map_err(column_error)?,
            refresh_token: row.try_get("refresh_token").map_err(column_error)?,
            client_ips: client_ips.0,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(column_error)?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(column_error)?,
        })
    }

    async fn insert<'e, E>(executor: E, session: &Session) -> Result<(), sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = sqlx::MySql>,
    {
        sqlx::query(
            r#"
            INSERT INTO sessions
                (id, account_id, refresh_token, refresh_token_hash, client_ips, expires_at, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(session.id.to_string())
        .bind(session.account_id)
        .bind(&session.refresh_token)
        .bind(refresh_token_hash(&session.refresh_token))
        .bind(Json(&session.client_ips))
        .bind(session.expires_at)
        .bind(session.created_at)
        .execute(executor)
        .await?;
        Ok(())
    }
}

fn column_error(e: sqlx::Error) -> DomainError {
    DomainError::Internal {
        message: format!("Failed to decode session row: {}", e),
    }
}

#[async_trait]
impl SessionRepository for MySqlSessionRepository {
    async fn create(&self, session: Session) -> Result<Session, DomainError> {
        Self::insert(&self.pool, &session)
            .await
            .map_err(|e| DomainError::store("create session", e))?;

        tracing::debug!(session_id = %session.id, account_id = session.account_id, "Session stored");
        Ok(session)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, DomainError> {
        let query = format!("SELECT {} FROM sessions WHERE id = ?", SESSION_COLUMNS);
        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::store("find session", e))?;

        row.as_ref().map(Self::row_to_session).transpose()
    }

    async fn find_by_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<Session>, DomainError> {
        let query = format!(
            "SELECT {} FROM sessions WHERE refresh_token_hash = ?",
            SESSION_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(refresh_token_hash(refresh_token))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::store("find session by token", e))?;

        let session = row.as_ref().map(Self::row_to_session).transpose()?;
        // Hash match alone is not an exact match
        Ok(session.filter(|s| s.refresh_token == refresh_token))
    }

    async fn find_by_account(&self, account_id: i64) -> Result<Vec<Session>, DomainError> {
        let query = format!(
            "SELECT {} FROM sessions WHERE account_id = ? ORDER BY created_at DESC",
            SESSION_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(account_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::store("list sessions", e))?;

        rows.iter().map(Self::row_to_session).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::store("delete session", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_refresh_token(&self, refresh_token: &str) -> Result<bool, DomainError> {
        let result =
            sqlx::query("DELETE FROM sessions WHERE refresh_token_hash = ? AND refresh_token = ?")
                .bind(refresh_token_hash(refresh_token))
                .bind(refresh_token)
                .execute(&self.pool)
                .await
                .map_err(|e| DomainError::store("delete session by token", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_account(&self, account_id: i64) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM sessions WHERE account_id = ?")
            .bind(account_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::store("delete account sessions", e))?;

        Ok(result.rows_affected() as usize)
    }

    async fn replace(&self, old_id: Uuid, replacement: Session) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::store("begin session rotation", e))?;

        let deleted = sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(old_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::store("rotate session", e))?;

        if deleted.rows_affected() == 0 {
            // Someone else rotated or revoked it first
            tx.rollback()
                .await
                .map_err(|e| DomainError::store("rollback session rotation", e))?;
            return Ok(false);
        }

        Self::insert(&mut *tx, &replacement)
            .await
            .map_err(|e| DomainError::store("rotate session", e))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::store("commit session rotation", e))?;

        Ok(true)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::store("purge expired sessions", e))?;

        Ok(result.rows_affected() as usize)
    }
}
