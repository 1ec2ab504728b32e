use sea_orm::entity::prelude::*;

/// Marketplace account of any role.
///
/// Phone and e-mail carry no unique index: uniqueness only holds among
/// records with a password, and is enforced by the service.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub phone_number: String,
    pub email: String,
    /// bcrypt hash; empty for placeholder records.
    pub password: String,
    pub role: i16,
    pub is_phone_active: bool,
    pub is_email_active: bool,
    pub is_passport_active: bool,
    pub master_id: Option<Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_devices::Entity")]
    UserDevices,
}

impl Related<super::user_devices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserDevices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
