//! MySQL implementation of the AccountRepository trait.
//!
//! Accounts live in `accounts`, role grants in `account_roles`. Deleting an
//! account cascades to roles, sessions, devices and login history.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};

use ks_core::domain::entities::{Account, NewAccount, Role};
use ks_core::errors::{AuthError, DomainError, DuplicateField};
use ks_core::repositories::AccountRepository;

/// MySQL implementation of AccountRepository
pub struct MySqlAccountRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlAccountRepository {
    /// Create a new MySQL account repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to Account entity; roles are filled separately
    fn row_to_account(row: &sqlx::mysql::MySqlRow) -> Result<Account, DomainError> {
        Ok(Account {
            id: row.try_get("id").map_err(column_error)?,
            email: row.try_get("email").map_err(column_error)?,
            nickname: row.try_get("nickname").map_err(column_error)?,
            password_hash: row.try_get("password_hash").map_err(column_error)?,
            roles: Vec::new(),
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(column_error)?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(column_error)?,
        })
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<Account>, DomainError> {
        // `column` is always one of our own literals, never user input
        let query = format!(
            "SELECT id, email, nickname, password_hash, created_at, updated_at \
             FROM accounts WHERE {} = ? LIMIT 1",
            column
        );

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::store("find account", e))?;

        self.with_roles(row).await
    }

    async fn with_roles(
        &self,
        row: Option<sqlx::mysql::MySqlRow>,
    ) -> Result<Option<Account>, DomainError> {
        match row {
            Some(row) => {
                let mut account = Self::row_to_account(&row)?;
                account.roles = self.find_roles(account.id).await?;
                Ok(Some(account))
            }
            None => Ok(None),
        }
    }

    async fn exists(&self, column: &str, value: &str) -> Result<bool, DomainError> {
        let query = format!("SELECT EXISTS(SELECT 1 FROM accounts WHERE {} = ?)", column);
        let exists: i64 = sqlx::query_scalar(&query)
            .bind(value)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::store("check account existence", e))?;
        Ok(exists == 1)
    }
}

fn column_error(e: sqlx::Error) -> DomainError {
    DomainError::Internal {
        message: format!("Failed to decode account row: {}", e),
    }
}

/// Maps a unique-key violation on insert to the colliding field
fn map_insert_error(e: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            let field = if db.message().contains("uk_accounts_nickname") {
                DuplicateField::Nickname
            } else {
                DuplicateField::Email
            };
            return AuthError::DuplicateAccount { field }.into();
        }
    }
    DomainError::store("create account", e)
}

#[async_trait]
impl AccountRepository for MySqlAccountRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, nickname, password_hash, created_at, updated_at
            FROM accounts
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::store("find account", e))?;

        self.with_roles(row).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        self.find_one("email", email).await
    }

    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<Account>, DomainError> {
        self.find_one("nickname", nickname).await
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        self.exists("email", email).await
    }

    async fn exists_by_nickname(&self, nickname: &str) -> Result<bool, DomainError> {
        self.exists("nickname", nickname).await
    }

    async fn create(&self, account: NewAccount) -> Result<Account, DomainError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO accounts (email, nickname, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&account.email)
        .bind(&account.nickname)
        .bind(&account.password_hash)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_insert_error)?;

        Ok(Account {
            id: result.last_insert_id() as i64,
            email: account.email,
            nickname: account.nickname,
            password_hash: account.password_hash,
            roles: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::store("delete account", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_roles(&self, account_id: i64) -> Result<Vec<Role>, DomainError> {
        let names: Vec<String> =
            sqlx::query_scalar("SELECT role FROM account_roles WHERE account_id = ?")
                .bind(account_id)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| DomainError::store("load roles", e))?;

        Ok(Role::parse_lossy(names.iter().map(String::as_str)))
    }

    async fn assign_role(&self, account_id: i64, role: Role) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT IGNORE INTO account_roles (account_id, role, granted_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(account_id)
        .bind(role.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::store("assign role", e))?;

        Ok(())
    }
}
