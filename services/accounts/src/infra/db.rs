use anyhow::{Context as _, anyhow};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, sea_query::OnConflict,
};
use uuid::Uuid;

use zakaion_accounts_schema::{user_devices, users};
use zakaion_domain::pagination::{Page, PageRequest};
use zakaion_domain::role::Role;

use crate::domain::repository::{DeviceRepository, RoleUserRepository, UserDirectory};
use crate::domain::types::{User, UserDevice};
use crate::error::AccountsError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

fn address_matches(address: &str) -> Condition {
    Condition::any()
        .add(users::Column::PhoneNumber.eq(address))
        .add(users::Column::Email.eq(address))
}

impl UserDirectory for DbUserRepository {
    async fn find_by_address(&self, address: &str) -> Result<Option<User>, AccountsError> {
        if address.is_empty() {
            return Ok(None);
        }
        let models = users::Entity::find()
            .filter(address_matches(address))
            .order_by_desc(users::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("find users by address")?;

        let mut candidates = models
            .into_iter()
            .map(user_from_model)
            .collect::<Result<Vec<_>, _>>()?;
        if candidates.is_empty() {
            return Ok(None);
        }
        let chosen = candidates
            .iter()
            .position(|u| !u.is_placeholder())
            .unwrap_or(0);
        Ok(Some(candidates.swap_remove(chosen)))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AccountsError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn save(&self, user: &User) -> Result<User, AccountsError> {
        users::Entity::insert(user_to_active_model(user))
            .on_conflict(
                OnConflict::column(users::Column::Id)
                    .update_columns([
                        users::Column::FirstName,
                        users::Column::LastName,
                        users::Column::MiddleName,
                        users::Column::PhoneNumber,
                        users::Column::Email,
                        users::Column::Password,
                        users::Column::Role,
                        users::Column::IsPhoneActive,
                        users::Column::IsEmailActive,
                        users::Column::IsPassportActive,
                        users::Column::MasterId,
                        users::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("save user")?;
        Ok(user.clone())
    }

    async fn exists_with_address(
        &self,
        address: &str,
        excluding: Option<Uuid>,
    ) -> Result<bool, AccountsError> {
        if address.is_empty() {
            return Ok(false);
        }
        let mut query = users::Entity::find()
            .filter(address_matches(address))
            .filter(users::Column::Password.ne(""));
        if let Some(id) = excluding {
            query = query.filter(users::Column::Id.ne(id));
        }
        let count = query
            .count(&self.db)
            .await
            .context("count users by address")?;
        Ok(count > 0)
    }
}

impl RoleUserRepository for DbUserRepository {
    async fn list_by_role(
        &self,
        role: Role,
        master: Option<Uuid>,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<User>, AccountsError> {
        let mut query = users::Entity::find().filter(users::Column::Role.eq(i16::from(role.as_u8())));
        if let Some(master) = master {
            query = query.filter(users::Column::MasterId.eq(master));
        }
        if let Some(search) = search {
            query = query.filter(
                Condition::any()
                    .add(users::Column::FirstName.contains(search))
                    .add(users::Column::LastName.contains(search))
                    .add(users::Column::MiddleName.contains(search))
                    .add(users::Column::PhoneNumber.contains(search))
                    .add(users::Column::Email.contains(search)),
            );
        }

        let total_elements = query
            .clone()
            .count(&self.db)
            .await
            .context("count users by role")?;
        let models = query
            .order_by_desc(users::Column::CreatedAt)
            .offset(page.offset())
            .limit(u64::from(page.size))
            .all(&self.db)
            .await
            .context("list users by role")?;

        Ok(Page {
            content: models
                .into_iter()
                .map(user_from_model)
                .collect::<Result<_, _>>()?,
            page: page.page,
            size: page.size,
            total_elements,
        })
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AccountsError> {
        let result = users::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(result.rows_affected > 0)
    }
}

fn user_to_active_model(user: &User) -> users::ActiveModel {
    users::ActiveModel {
        id: Set(user.id),
        first_name: Set(user.first_name.clone()),
        last_name: Set(user.last_name.clone()),
        middle_name: Set(user.middle_name.clone()),
        phone_number: Set(user.phone_number.clone()),
        email: Set(user.email.clone()),
        password: Set(user.password_hash.clone()),
        role: Set(i16::from(user.role.as_u8())),
        is_phone_active: Set(user.is_phone_active),
        is_email_active: Set(user.is_email_active),
        is_passport_active: Set(user.is_passport_active),
        master_id: Set(user.master_id),
        created_at: Set(user.created_at),
        updated_at: Set(user.updated_at),
    }
}

fn user_from_model(model: users::Model) -> Result<User, AccountsError> {
    let role = u8::try_from(model.role)
        .ok()
        .and_then(Role::from_u8)
        .ok_or_else(|| anyhow!("user {} has unknown role {}", model.id, model.role))?;
    Ok(User {
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        middle_name: model.middle_name,
        phone_number: model.phone_number,
        email: model.email,
        password_hash: model.password,
        role,
        is_phone_active: model.is_phone_active,
        is_email_active: model.is_email_active,
        is_passport_active: model.is_passport_active,
        master_id: model.master_id,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Device repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbDeviceRepository {
    pub db: DatabaseConnection,
}

impl DeviceRepository for DbDeviceRepository {
    async fn create(&self, device: &UserDevice) -> Result<(), AccountsError> {
        user_devices::ActiveModel {
            id: Set(device.id),
            user_id: Set(device.user_id),
            name: Set(device.name.clone()),
            fcm_token: Set(device.fcm_token.clone()),
            created_at: Set(device.created_at),
        }
        .insert(&self.db)
        .await
        .context("create user device")?;
        Ok(())
    }
}
