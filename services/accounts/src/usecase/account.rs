use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use zakaion_auth_types::token::TokenCodec;
use zakaion_domain::capability::Capability;

use crate::domain::repository::{DeviceRepository, UserDirectory};
use crate::domain::types::{User, UserDevice};
use crate::error::AccountsError;
use crate::infra::password::PasswordHasher;

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub user: User,
    pub token: String,
}

pub struct LoginUseCase<U: UserDirectory> {
    pub users: U,
    pub codec: TokenCodec,
    pub hasher: PasswordHasher,
}

impl<U: UserDirectory> LoginUseCase<U> {
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, AccountsError> {
        let email = input.email.trim();
        if email.is_empty() || input.password.is_empty() {
            return Err(AccountsError::WrongCredential);
        }
        let user = self
            .users
            .find_by_address(email)
            .await?
            .filter(|u| u.email == email && !u.is_placeholder())
            .ok_or(AccountsError::WrongCredential)?;

        if !self.hasher.verify(&input.password, &user.password_hash).await? {
            return Err(AccountsError::WrongCredential);
        }

        let token = self.codec.issue_session(&user.session_claims())?;
        info!(user_id = %user.id, "login");
        Ok(LoginOutput { user, token })
    }
}

// ── CurrentUser ──────────────────────────────────────────────────────────────

/// Resolve the record behind an authenticated session.
pub struct CurrentUserUseCase<U: UserDirectory> {
    pub users: U,
}

impl<U: UserDirectory> CurrentUserUseCase<U> {
    /// `Unauthorized` when the token outlived its user.
    pub async fn execute(&self, user_id: Uuid) -> Result<User, AccountsError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AccountsError::Unauthorized)
    }
}

// ── UpdateUser ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct UpdateUserInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

pub struct UpdateUserUseCase<U: UserDirectory> {
    pub users: U,
}

impl<U: UserDirectory> UpdateUserUseCase<U> {
    /// Staff may edit anyone; everyone else only themselves.
    pub async fn execute(
        &self,
        actor: &User,
        target_id: Uuid,
        input: UpdateUserInput,
    ) -> Result<User, AccountsError> {
        if actor.id != target_id && !Capability::SuperAdminAdminEditor.allows(actor.role) {
            return Err(AccountsError::Forbidden);
        }
        let mut user = self
            .users
            .find_by_id(target_id)
            .await?
            .ok_or(AccountsError::NotFound)?;

        if let Some(first_name) = input.first_name {
            user.first_name = Some(first_name);
        }
        if let Some(last_name) = input.last_name {
            user.last_name = Some(last_name);
        }
        if let Some(middle_name) = input.middle_name {
            user.middle_name = Some(middle_name);
        }
        let phone_number = input.phone_number.map(|p| p.trim().to_owned());
        if let Some(phone_number) = phone_number.filter(|p| *p != user.phone_number) {
            if self
                .users
                .exists_with_address(&phone_number, Some(user.id))
                .await?
            {
                return Err(AccountsError::AlreadyTaken);
            }
            user.phone_number = phone_number;
            user.is_phone_active = false;
        }
        let email = input.email.map(|e| e.trim().to_owned());
        if let Some(email) = email.filter(|e| *e != user.email) {
            if self.users.exists_with_address(&email, Some(user.id)).await? {
                return Err(AccountsError::AlreadyTaken);
            }
            user.email = email;
            user.is_email_active = false;
        }

        user.updated_at = Utc::now();
        self.users.save(&user).await
    }
}

// ── ChangePassword ───────────────────────────────────────────────────────────

pub struct ChangePasswordInput {
    pub old_password: String,
    pub new_password: String,
}

pub struct ChangePasswordUseCase<U: UserDirectory> {
    pub users: U,
    pub hasher: PasswordHasher,
}

impl<U: UserDirectory> ChangePasswordUseCase<U> {
    /// A placeholder sets its first password with an empty `old_password`.
    pub async fn execute(
        &self,
        actor: &User,
        input: ChangePasswordInput,
    ) -> Result<(), AccountsError> {
        if input.new_password.is_empty() {
            return Err(AccountsError::BadParams);
        }
        let matches = if actor.is_placeholder() {
            input.old_password.is_empty()
        } else {
            self.hasher
                .verify(&input.old_password, &actor.password_hash)
                .await?
        };
        if !matches {
            return Err(AccountsError::WrongCredential);
        }

        let mut user = actor.clone();
        user.password_hash = self.hasher.hash(&input.new_password).await?;
        user.updated_at = Utc::now();
        self.users.save(&user).await?;
        info!(user_id = %user.id, "password changed");
        Ok(())
    }
}

// ── AddDevice ────────────────────────────────────────────────────────────────

pub struct AddDeviceInput {
    pub name: String,
    pub fcm_token: String,
}

pub struct AddDeviceUseCase<D: DeviceRepository> {
    pub devices: D,
}

impl<D: DeviceRepository> AddDeviceUseCase<D> {
    pub async fn execute(&self, actor: &User, input: AddDeviceInput) -> Result<(), AccountsError> {
        if input.name.trim().is_empty() || input.fcm_token.trim().is_empty() {
            return Err(AccountsError::BadParams);
        }
        let device = UserDevice {
            id: Uuid::now_v7(),
            user_id: actor.id,
            name: input.name,
            fcm_token: input.fcm_token,
            created_at: Utc::now(),
        };
        self.devices.create(&device).await
    }
}
