use anyhow::Context as _;
use deadpool_redis::Pool;
use deadpool_redis::redis::{AsyncCommands, ExistenceCheck, SetExpiry, SetOptions};

use crate::domain::repository::ChallengeRegistry;
use crate::error::AccountsError;

/// Redis set of spent challenge tokens, keyed by JWT signature.
#[derive(Clone)]
pub struct RedisChallengeRegistry {
    pub pool: Pool,
}

fn redeemed_key(token: &str) -> String {
    // Signature segment identifies the token.
    let signature = token.rsplit('.').next().unwrap_or(token);
    format!("challenge_redeemed:{signature}")
}

impl ChallengeRegistry for RedisChallengeRegistry {
    async fn claim(&self, token: &str, ttl_secs: u64) -> Result<bool, AccountsError> {
        let mut conn = self.pool.get().await.context("get redis connection")?;
        let options = SetOptions::default()
            .conditional_set(ExistenceCheck::NX)
            .with_expiration(SetExpiry::EX(ttl_secs));
        let set: Option<String> = conn
            .set_options(redeemed_key(token), 1, options)
            .await
            .context("record redeemed challenge")?;
        Ok(set.is_some())
    }

    async fn release(&self, token: &str) -> Result<(), AccountsError> {
        let mut conn = self.pool.get().await.context("get redis connection")?;
        let _: () = conn
            .del(redeemed_key(token))
            .await
            .context("release redeemed challenge")?;
        Ok(())
    }
}

/// Single-use enforcement, off unless configured.
#[derive(Clone)]
pub enum Registry {
    /// Tokens stay redeemable until they expire.
    Disabled,
    Redis(RedisChallengeRegistry),
}

impl ChallengeRegistry for Registry {
    async fn claim(&self, token: &str, ttl_secs: u64) -> Result<bool, AccountsError> {
        match self {
            Self::Disabled => Ok(true),
            Self::Redis(registry) => registry.claim(token, ttl_secs).await,
        }
    }

    async fn release(&self, token: &str) -> Result<(), AccountsError> {
        match self {
            Self::Disabled => Ok(()),
            Self::Redis(registry) => registry.release(token).await,
        }
    }
}
