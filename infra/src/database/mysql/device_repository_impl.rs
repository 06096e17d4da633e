//! MySQL implementation of the DeviceRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};

use ks_core::domain::entities::{Device, DeviceUpsert};
use ks_core::errors::DomainError;
use ks_core::repositories::DeviceRepository;

/// MySQL implementation of DeviceRepository
pub struct MySqlDeviceRepository {
    pool: MySqlPool,
}

impl MySqlDeviceRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_device(row: &sqlx::mysql::MySqlRow) -> Result<Device, sqlx::Error> {
        Ok(Device {
            id: row.try_get("id")?,
            account_id: row.try_get("account_id")?,
            fingerprint: row.try_get("fingerprint")?,
            user_agent: row.try_get("user_agent")?,
            last_ip: row.try_get("last_ip")?,
            last_seen_at: row.try_get::<DateTime<Utc>, _>("last_seen_at")?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        })
    }
}

#[async_trait]
impl DeviceRepository for MySqlDeviceRepository {
    async fn upsert(&self, device: DeviceUpsert) -> Result<Device, DomainError> {
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO devices (account_id, fingerprint, user_agent, last_ip, last_seen_at, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                user_agent = COALESCE(VALUES(user_agent), user_agent),
                last_ip = COALESCE(VALUES(last_ip), last_ip),
                last_seen_at = VALUES(last_seen_at)
            "#,
        )
        .bind(device.account_id)
        .bind(&device.fingerprint)
        .bind(&device.user_agent)
        .bind(&device.ip)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::store("upsert device", e))?;

        let row = sqlx::query(
            r#"
            SELECT id, account_id, fingerprint, user_agent, last_ip, last_seen_at, created_at
            FROM devices
            WHERE account_id = ? AND fingerprint = ?
            "#,
        )
        .bind(device.account_id)
        .bind(&device.fingerprint)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::store("load device", e))?;

        Self::row_to_device(&row).map_err(|e| DomainError::store("decode device", e))
    }

    async fn find_by_account(&self, account_id: i64) -> Result<Vec<Device>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, account_id, fingerprint, user_agent, last_ip, last_seen_at, created_at
            FROM devices
            WHERE account_id = ?
            ORDER BY last_seen_at DESC
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::store("list devices", e))?;

        rows.iter()
            .map(Self::row_to_device)
            .collect::<Result<_, _>>()
            .map_err(|e| DomainError::store("decode device", e))
    }
}
