//! Signed, expiring tokens (HS256 JWT).
//!
//! One codec serves two claim shapes: long-lived session tokens that identify
//! a user, and short-lived challenge tokens that bind a contact address to a
//! one-time code.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session token lifetime (1 year).
pub const SESSION_TOKEN_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Challenge token lifetime (1 hour).
pub const CHALLENGE_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// Scheme prefix carried by session tokens handed to clients.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Errors returned by [`TokenCodec`].
///
/// Decoding failures are deliberately undifferentiated: malformed input,
/// signature mismatch and expiry all yield [`TokenError::Invalid`].
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid token")]
    Invalid,
    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Session claims: who the bearer is.
///
/// | Field | JWT claim |
/// |-------|-----------|
/// | `id` | `id` (UUID string) |
/// | `first_name` | `fName` |
/// | `last_name` | `lName` |
/// | `middle_name` | `mName` |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub id: Uuid,
    #[serde(rename = "fName")]
    pub first_name: Option<String>,
    #[serde(rename = "lName")]
    pub last_name: Option<String>,
    #[serde(rename = "mName")]
    pub middle_name: Option<String>,
}

/// Contact channel a challenge is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Phone,
    Email,
}

/// Challenge claims: a contact address bound to a one-time code.
///
/// The address claim keeps its historical `phone_number` name even when it
/// carries an e-mail; `channel` says which. A `None` code marks a
/// registration ticket, i.e. a challenge that has already been answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeClaims {
    pub channel: Channel,
    #[serde(rename = "phone_number")]
    pub address: String,
    #[serde(rename = "sms_code")]
    pub code: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct Signed<C> {
    #[serde(flatten)]
    claims: C,
    exp: u64,
}

/// Seconds since the UNIX epoch.
pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// HS256 encoder/decoder over a symmetric key.
///
/// The key comes from configuration and is fixed for the lifetime of the
/// process.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Sign `claims` with an expiry `ttl` from now.
    pub fn encode<C: Serialize>(&self, claims: &C, ttl: Duration) -> Result<String, TokenError> {
        self.encode_at(claims, ttl, now_secs())
    }

    /// Sign `claims` as if issued at `issued_at` (seconds since epoch).
    pub fn encode_at<C: Serialize>(
        &self,
        claims: &C,
        ttl: Duration,
        issued_at: u64,
    ) -> Result<String, TokenError> {
        let signed = Signed {
            claims,
            exp: issued_at + ttl.as_secs(),
        };
        encode(&Header::new(Algorithm::HS256), &signed, &self.encoding)
            .map_err(TokenError::Signing)
    }

    /// Verify signature and expiry, returning the claims.
    ///
    /// No leeway: a token is rejected as soon as its `exp` has passed.
    pub fn decode<C: DeserializeOwned>(&self, token: &str) -> Result<C, TokenError> {
        self.decode_with_exp(token).map(|(claims, _)| claims)
    }

    /// Same as [`decode`](Self::decode), also returning the `exp` claim.
    pub fn decode_with_exp<C: DeserializeOwned>(
        &self,
        token: &str,
    ) -> Result<(C, u64), TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let data = decode::<Signed<C>>(token, &self.decoding, &validation)
            .map_err(|_| TokenError::Invalid)?;
        Ok((data.claims.claims, data.claims.exp))
    }

    // ── Session tokens ───────────────────────────────────────────────────

    /// Issue a session token, prefixed with `Bearer `.
    pub fn issue_session(&self, claims: &SessionClaims) -> Result<String, TokenError> {
        let token = self.encode(claims, SESSION_TOKEN_TTL)?;
        Ok(format!("{BEARER_PREFIX}{token}"))
    }

    /// Parse a session token, with or without the `Bearer ` prefix.
    pub fn parse_session(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let raw = token.strip_prefix(BEARER_PREFIX).unwrap_or(token).trim();
        self.decode(raw)
    }

    // ── Challenge tokens ─────────────────────────────────────────────────

    pub fn issue_challenge(
        &self,
        channel: Channel,
        address: &str,
        code: Option<&str>,
    ) -> Result<String, TokenError> {
        let claims = ChallengeClaims {
            channel,
            address: address.to_owned(),
            code: code.map(str::to_owned),
        };
        self.encode(&claims, CHALLENGE_TOKEN_TTL)
    }

    pub fn parse_challenge(&self, token: &str) -> Result<ChallengeClaims, TokenError> {
        self.decode(token)
    }
}
