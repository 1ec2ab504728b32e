use serde::Deserialize;

use zakaion_core::config::Config;

/// Accounts service configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountsConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// HMAC key for session and challenge tokens. Env var: `JWT_SECRET`.
    pub jwt_secret: String,
    /// TCP port to listen on (default 3110). Env var: `ACCOUNTS_PORT`.
    #[serde(default = "default_port")]
    pub accounts_port: u16,
    /// Redis URL, required when `challenge_single_use` is on.
    pub redis_url: Option<String>,
    /// Reject a challenge token after its first redemption. Env var: `CHALLENGE_SINGLE_USE`.
    #[serde(default)]
    pub challenge_single_use: bool,
    /// Use this code for every challenge instead of a random one.
    /// Env var: `VERIFICATION_FIXED_CODE`.
    pub verification_fixed_code: Option<String>,
    /// Gateway that delivers codes; codes are only logged when unset.
    /// Env var: `CODE_DELIVERY_URL`.
    pub code_delivery_url: Option<String>,
    /// bcrypt work factor (default 12). Env var: `BCRYPT_COST`.
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

fn default_port() -> u16 {
    3110
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

impl Config for AccountsConfig {}
