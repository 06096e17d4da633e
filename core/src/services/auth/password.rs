//! bcrypt password hashing off the async executor

use crate::errors::DomainError;

/// Cost bounds accepted by bcrypt
const MIN_COST: u32 = 4;
const MAX_COST: u32 = 31;

/// Hashes and verifies passwords with bcrypt on the blocking thread pool
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    /// Hash of a throwaway password, verified against when an account does
    /// not exist so both paths take the same time
    dummy_hash: String,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Result<Self, DomainError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(DomainError::Internal {
                message: format!(
                    "bcrypt cost {} outside {}..={}",
                    cost, MIN_COST, MAX_COST
                ),
            });
        }

        let dummy_hash = bcrypt::hash("keystone-dummy-password", cost).map_err(internal)?;
        Ok(Self { cost, dummy_hash })
    }

    pub async fn hash(&self, password: &str) -> Result<String, DomainError> {
        let password = password.to_owned();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(internal)?
            .map_err(internal)
    }

    /// Verifies `password` against `hash`, or against the dummy hash when
    /// there is no account. A missing account never verifies.
    pub async fn verify(&self, password: &str, hash: Option<&str>) -> Result<bool, DomainError> {
        let known = hash.is_some();
        let password = password.to_owned();
        let hash = hash.unwrap_or(&self.dummy_hash).to_owned();

        let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(internal)?
            .map_err(internal)?;

        Ok(known && matches)
    }
}

fn internal(err: impl std::fmt::Display) -> DomainError {
    DomainError::Internal {
        message: format!("password hashing failed: {}", err),
    }
}
