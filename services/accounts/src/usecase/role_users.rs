//! Management of the users of one role, with the role passed as data.

use tracing::info;
use uuid::Uuid;

use zakaion_domain::capability::{RoleAction, required_capability};
use zakaion_domain::pagination::{Page, PageRequest};
use zakaion_domain::role::Role;

use crate::domain::repository::{RoleUserRepository, UserDirectory};
use crate::domain::types::User;
use crate::error::AccountsError;
use crate::infra::password::PasswordHasher;

pub struct AddRoleUserInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub phone_number: String,
    pub email: String,
    /// Blank leaves the record as a placeholder.
    pub password: Option<String>,
}

pub struct RoleUsersUseCase<R, U>
where
    R: RoleUserRepository,
    U: UserDirectory,
{
    pub role: Role,
    pub repo: R,
    pub users: U,
    pub hasher: PasswordHasher,
}

impl<R, U> RoleUsersUseCase<R, U>
where
    R: RoleUserRepository,
    U: UserDirectory,
{
    fn authorize(&self, actor: &User, action: RoleAction) -> Result<(), AccountsError> {
        match required_capability(self.role, action) {
            Some(capability) if capability.allows(actor.role) => Ok(()),
            _ => Err(AccountsError::Forbidden),
        }
    }

    /// Partners only ever see the records they own.
    fn owner_scope(actor: &User) -> Option<Uuid> {
        (actor.role == Role::Partner).then_some(actor.id)
    }

    pub async fn list(
        &self,
        actor: &User,
        page: PageRequest,
        search: Option<&str>,
    ) -> Result<Page<User>, AccountsError> {
        self.authorize(actor, RoleAction::List)?;
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        self.repo
            .list_by_role(self.role, Self::owner_scope(actor), search, page.clamped())
            .await
    }

    pub async fn get(&self, actor: &User, id: Uuid) -> Result<User, AccountsError> {
        self.authorize(actor, RoleAction::List)?;
        self.find_managed(actor, id).await
    }

    pub async fn add(&self, actor: &User, input: AddRoleUserInput) -> Result<User, AccountsError> {
        self.authorize(actor, RoleAction::Add)?;

        let phone_number = input.phone_number.trim().to_owned();
        let email = input.email.trim().to_owned();
        if phone_number.is_empty() || email.is_empty() {
            return Err(AccountsError::BadParams);
        }
        if self.users.exists_with_address(&phone_number, None).await?
            || self.users.exists_with_address(&email, None).await?
        {
            return Err(AccountsError::AlreadyTaken);
        }

        let mut user = User::new(self.role, phone_number, email);
        user.first_name = input.first_name;
        user.last_name = input.last_name;
        user.middle_name = input.middle_name;
        if let Some(password) = input.password.filter(|p| !p.is_empty()) {
            user.password_hash = self.hasher.hash(&password).await?;
        }
        user.master_id = Self::owner_scope(actor);

        let user = self.users.save(&user).await?;
        info!(user_id = %user.id, role = ?self.role, added_by = %actor.id, "user added");
        Ok(user)
    }

    /// Fails `NotFound` when `id` belongs to another role.
    pub async fn delete(&self, actor: &User, id: Uuid) -> Result<(), AccountsError> {
        self.authorize(actor, RoleAction::Delete)?;
        let user = self.find_managed(actor, id).await?;
        if !self.repo.delete(user.id).await? {
            return Err(AccountsError::NotFound);
        }
        info!(user_id = %id, role = ?self.role, deleted_by = %actor.id, "user deleted");
        Ok(())
    }

    async fn find_managed(&self, actor: &User, id: Uuid) -> Result<User, AccountsError> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .filter(|u| u.role == self.role)
            .ok_or(AccountsError::NotFound)?;
        match Self::owner_scope(actor) {
            Some(owner) if user.master_id != Some(owner) => Err(AccountsError::NotFound),
            _ => Ok(user),
        }
    }
}
