//! MySQL implementation of the SigningKeyRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};

use ks_core::domain::entities::{NewSigningKey, SigningKeyPair};
use ks_core::errors::DomainError;
use ks_core::repositories::SigningKeyRepository;

/// MySQL implementation of SigningKeyRepository
pub struct MySqlSigningKeyRepository {
    pool: MySqlPool,
}

impl MySqlSigningKeyRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_key(row: &sqlx::mysql::MySqlRow) -> Result<SigningKeyPair, sqlx::Error> {
        Ok(SigningKeyPair {
            id: row.try_get("id")?,
            public_key: row.try_get("public_key")?,
            private_key: row.try_get("private_key")?,
            active: row.try_get("active")?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
            updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
        })
    }
}

#[async_trait]
impl SigningKeyRepository for MySqlSigningKeyRepository {
    async fn get_active(&self) -> Result<Option<SigningKeyPair>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, public_key, private_key, active, created_at, updated_at
            FROM signing_keys
            WHERE active = TRUE
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::store("load active signing key", e))?;

        row.as_ref()
            .map(Self::row_to_key)
            .transpose()
            .map_err(|e| DomainError::store("decode signing key", e))
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<SigningKeyPair>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, public_key, private_key, active, created_at, updated_at
            FROM signing_keys
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::store("load signing key", e))?;

        row.as_ref()
            .map(Self::row_to_key)
            .transpose()
            .map_err(|e| DomainError::store("decode signing key", e))
    }

    async fn create(&self, key: NewSigningKey) -> Result<SigningKeyPair, DomainError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO signing_keys (public_key, private_key, active, created_at, updated_at)
            VALUES (?, ?, FALSE, ?, ?)
            "#,
        )
        .bind(&key.public_key)
        .bind(&key.private_key)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::store("store signing key", e))?;

        Ok(SigningKeyPair {
            id: result.last_insert_id() as i64,
            public_key: key.public_key,
            private_key: key.private_key,
            active: false,
            created_at: now,
            updated_at: now,
        })
    }

    async fn set_active(&self, id: i64) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::store("begin key activation", e))?;

        let exists: Option<i64> =
            sqlx::query_scalar("SELECT id FROM signing_keys WHERE id = ? FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| DomainError::store("activate signing key", e))?;

        if exists.is_none() {
            tx.rollback()
                .await
                .map_err(|e| DomainError::store("rollback key activation", e))?;
            return Ok(false);
        }

        let now = Utc::now();
        sqlx::query("UPDATE signing_keys SET active = (id = ?), updated_at = ? WHERE active = TRUE OR id = ?")
            .bind(id)
            .bind(now)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::store("activate signing key", e))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::store("commit key activation", e))?;

        tracing::info!(key_id = id, "Signing key activated");
        Ok(true)
    }
}
