use tracing::info;

use zakaion_auth_types::token::TokenCodec;
use zakaion_domain::role::Role;

use crate::domain::repository::UserDirectory;
use crate::domain::types::{Channel, User, mask_address};
use crate::error::AccountsError;
use crate::infra::password::PasswordHasher;

pub struct RegisterClientInput {
    /// Registration ticket from a redeemed phone challenge.
    pub ticket: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct RegisterClientOutput {
    pub user: User,
    /// Session token, `Bearer ` prefix included.
    pub token: String,
}

pub struct RegisterClientUseCase<U: UserDirectory> {
    pub users: U,
    pub codec: TokenCodec,
    pub hasher: PasswordHasher,
}

impl<U: UserDirectory> RegisterClientUseCase<U> {
    pub async fn execute(
        &self,
        input: RegisterClientInput,
    ) -> Result<RegisterClientOutput, AccountsError> {
        let claims = self.codec.parse_challenge(&input.ticket)?;
        // A ticket is an answered phone challenge: no code left in it.
        if claims.channel != Channel::Phone || claims.code.is_some() {
            return Err(AccountsError::WrongCredential);
        }
        if input.password.is_empty() {
            return Err(AccountsError::BadParams);
        }

        let phone_number = claims.address;
        let email = input.email.trim().to_owned();
        if self.users.exists_with_address(&phone_number, None).await?
            || self.users.exists_with_address(&email, None).await?
        {
            return Err(AccountsError::AlreadyTaken);
        }

        let mut user = User::new(Role::Client, phone_number, email);
        user.first_name = input.first_name;
        user.last_name = input.last_name;
        user.middle_name = input.middle_name;
        user.password_hash = self.hasher.hash(&input.password).await?;
        user.is_phone_active = true;

        let user = self.users.save(&user).await?;
        let token = self.codec.issue_session(&user.session_claims())?;
        info!(
            user_id = %user.id,
            phone = %mask_address(&user.phone_number),
            "client registered"
        );
        Ok(RegisterClientOutput { user, token })
    }
}
