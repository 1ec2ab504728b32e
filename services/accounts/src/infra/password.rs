use anyhow::Context as _;

use crate::error::AccountsError;

/// bcrypt hashing, run on the blocking pool.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    pub cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl PasswordHasher {
    pub async fn hash(&self, password: &str) -> Result<String, AccountsError> {
        let password = password.to_owned();
        let cost = self.cost;
        let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .context("join bcrypt hash task")?
            .context("bcrypt hash")?;
        Ok(hashed)
    }

    /// `false` for a mismatch or an empty (placeholder) hash.
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool, AccountsError> {
        if hash.is_empty() {
            return Ok(false);
        }
        let password = password.to_owned();
        let hash = hash.to_owned();
        let matched = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .context("join bcrypt verify task")?
            // A malformed stored hash never matches.
            .unwrap_or(false);
        Ok(matched)
    }
}
