//! Two-step "request code, submit code" flows for phone numbers and e-mails.
//!
//! The only state carried between the two calls is the signed challenge
//! token handed back to the caller.

use rand::RngExt;
use tracing::{info, warn};

use zakaion_auth_types::token::{ChallengeClaims, TokenCodec, now_secs};

use crate::domain::repository::{ChallengeRegistry, CodeSender, UserDirectory};
use crate::domain::types::{Channel, User, VERIFICATION_CODE_LEN, mask_address};
use crate::error::AccountsError;

/// Source of one-time codes.
#[derive(Debug, Clone)]
pub enum CodeGenerator {
    /// Uniform numeric draw of [`VERIFICATION_CODE_LEN`] digits.
    Random,
    /// Same code for every challenge. Development only.
    Fixed(String),
}

impl CodeGenerator {
    pub fn generate(&self) -> String {
        match self {
            Self::Random => {
                let upper = 10u32.pow(VERIFICATION_CODE_LEN as u32);
                let n = rand::rng().random_range(0..upper);
                format!("{n:0width$}", width = VERIFICATION_CODE_LEN)
            }
            Self::Fixed(code) => code.clone(),
        }
    }
}

/// Result of redeeming a phone challenge for registration.
#[derive(Debug)]
pub struct RegistrationTicket {
    pub phone_number: String,
    /// Challenge token with a null code, accepted by client registration.
    pub ticket: String,
}

pub struct VerificationUseCase<U, S, R>
where
    U: UserDirectory,
    S: CodeSender,
    R: ChallengeRegistry,
{
    pub users: U,
    pub sender: S,
    pub registry: R,
    pub codec: TokenCodec,
    pub codes: CodeGenerator,
}

impl<U, S, R> VerificationUseCase<U, S, R>
where
    U: UserDirectory,
    S: CodeSender,
    R: ChallengeRegistry,
{
    // ── Issue ────────────────────────────────────────────────────────────────

    /// Send a fresh code to `address` and return the challenge token.
    ///
    /// Delivery is fire-and-forget: a failed send is logged and the token is
    /// still returned.
    async fn issue(&self, channel: Channel, address: &str) -> Result<String, AccountsError> {
        let code = self.codes.generate();
        let token = self.codec.issue_challenge(channel, address, Some(&code))?;

        if let Err(e) = self.sender.send(channel, address, &code).await {
            warn!(
                ?channel,
                address = %mask_address(address),
                error = %e,
                "code delivery failed"
            );
        }
        info!(?channel, address = %mask_address(address), "challenge issued");
        Ok(token)
    }

    pub async fn request_phone_challenge(&self, phone_number: &str) -> Result<String, AccountsError> {
        let phone_number = phone_number.trim();
        if phone_number.is_empty() {
            return Err(AccountsError::BadParams);
        }
        self.issue(Channel::Phone, phone_number).await
    }

    /// Only e-mails that already belong to a user can be challenged.
    pub async fn request_email_challenge(&self, email: &str) -> Result<String, AccountsError> {
        let user = self.user_by_email(email).await?;
        self.issue(Channel::Email, &user.email).await
    }

    /// Challenge the caller's own on-file phone or e-mail.
    pub async fn request_activation(
        &self,
        user: &User,
        channel: Channel,
    ) -> Result<String, AccountsError> {
        let address = user.address(channel);
        if address.is_empty() {
            return Err(AccountsError::BadParams);
        }
        self.issue(channel, address).await
    }

    // ── Redeem ───────────────────────────────────────────────────────────────

    /// Decode `token`, check it was issued for `channel` and compare its code.
    /// Does not consume the token.
    fn verify(
        &self,
        token: &str,
        code: &str,
        channel: Channel,
    ) -> Result<(ChallengeClaims, u64), AccountsError> {
        let (claims, exp) = self.codec.decode_with_exp::<ChallengeClaims>(token)?;
        if claims.channel != channel {
            return Err(AccountsError::WrongCredential);
        }
        match claims.code.as_deref() {
            Some(expected) if expected == code => Ok((claims, exp)),
            _ => Err(AccountsError::WrongCredential),
        }
    }

    /// Mark `token` spent for the rest of its lifetime.
    async fn consume(&self, token: &str, exp: u64) -> Result<(), AccountsError> {
        let ttl = exp.saturating_sub(now_secs()).max(1);
        if !self.registry.claim(token, ttl).await? {
            warn!("challenge token replayed");
            return Err(AccountsError::WrongCredential);
        }
        Ok(())
    }

    /// Persist the outcome of a consumed challenge. On failure the token is
    /// released so the caller can retry it.
    async fn save_redeemed(&self, token: &str, user: &User) -> Result<User, AccountsError> {
        match self.users.save(user).await {
            Ok(saved) => Ok(saved),
            Err(e) => {
                if let Err(release_err) = self.registry.release(token).await {
                    warn!(error = %release_err, "failed to release challenge token");
                }
                Err(e)
            }
        }
    }

    /// Exchange a phone challenge for a registration ticket.
    ///
    /// `phone_number`, when given, must be the address the challenge was
    /// issued for.
    pub async fn redeem_for_registration(
        &self,
        token: &str,
        code: &str,
        phone_number: Option<&str>,
    ) -> Result<RegistrationTicket, AccountsError> {
        let (claims, exp) = self.verify(token, code, Channel::Phone)?;
        if phone_number.is_some_and(|p| p.trim() != claims.address) {
            return Err(AccountsError::WrongCredential);
        }
        if self.users.exists_with_address(&claims.address, None).await? {
            return Err(AccountsError::AlreadyTaken);
        }
        self.consume(token, exp).await?;

        let ticket = self
            .codec
            .issue_challenge(Channel::Phone, &claims.address, None)?;
        info!(address = %mask_address(&claims.address), "phone verified for registration");
        Ok(RegistrationTicket {
            phone_number: claims.address,
            ticket,
        })
    }

    /// Flip the activation flag for `channel` on the caller's own record.
    pub async fn redeem_for_activation(
        &self,
        token: &str,
        code: &str,
        user: &User,
        channel: Channel,
    ) -> Result<User, AccountsError> {
        let (claims, exp) = self.verify(token, code, channel)?;
        let on_file = user.address(channel);
        if on_file.is_empty() || claims.address != on_file {
            return Err(AccountsError::WrongCredential);
        }
        self.consume(token, exp).await?;

        let mut user = user.clone();
        match channel {
            Channel::Phone => user.is_phone_active = true,
            Channel::Email => user.is_email_active = true,
        }
        user.updated_at = chrono::Utc::now();
        let saved = self.save_redeemed(token, &user).await?;
        info!(user_id = %saved.id, ?channel, "address activated");
        Ok(saved)
    }

    /// Confirm control of `email`. Marks the e-mail active; issuing a new
    /// password is not part of this flow.
    pub async fn redeem_for_password_reset(
        &self,
        token: &str,
        code: &str,
        email: &str,
    ) -> Result<User, AccountsError> {
        let mut user = self.user_by_email(email).await?;
        let (claims, exp) = self.verify(token, code, Channel::Email)?;
        if claims.address != user.email {
            return Err(AccountsError::WrongCredential);
        }
        self.consume(token, exp).await?;

        user.is_email_active = true;
        user.updated_at = chrono::Utc::now();
        let saved = self.save_redeemed(token, &user).await?;
        info!(user_id = %saved.id, "password reset challenge redeemed");
        Ok(saved)
    }

    async fn user_by_email(&self, email: &str) -> Result<User, AccountsError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AccountsError::BadParams);
        }
        self.users
            .find_by_address(email)
            .await?
            .filter(|u| u.email == email)
            .ok_or(AccountsError::NotFound)
    }
}
