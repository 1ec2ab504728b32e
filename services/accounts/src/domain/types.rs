use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

pub use zakaion_auth_types::token::Channel;
use zakaion_auth_types::token::SessionClaims;
use zakaion_domain::role::Role;

/// Number of digits in a verification code.
pub const VERIFICATION_CODE_LEN: usize = 4;

/// Account record of any role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub phone_number: String,
    pub email: String,
    /// bcrypt hash, or empty for a placeholder record.
    pub password_hash: String,
    pub role: Role,
    pub is_phone_active: bool,
    pub is_email_active: bool,
    pub is_passport_active: bool,
    pub master_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Fresh record with no names, no password and all flags cleared.
    pub fn new(role: Role, phone_number: String, email: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            first_name: None,
            last_name: None,
            middle_name: None,
            phone_number,
            email,
            password_hash: String::new(),
            role,
            is_phone_active: false,
            is_email_active: false,
            is_passport_active: false,
            master_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Records without a password do not take part in address uniqueness.
    pub fn is_placeholder(&self) -> bool {
        self.password_hash.is_empty()
    }

    pub fn address(&self, channel: Channel) -> &str {
        match channel {
            Channel::Phone => &self.phone_number,
            Channel::Email => &self.email,
        }
    }

    pub fn has_address(&self, address: &str) -> bool {
        !address.is_empty() && (self.phone_number == address || self.email == address)
    }

    pub fn session_claims(&self) -> SessionClaims {
        SessionClaims {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            middle_name: self.middle_name.clone(),
        }
    }
}

/// Public projection of [`User`]; never carries the password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub phone_number: String,
    pub email: String,
    pub role: Role,
    pub is_phone_active: bool,
    pub is_email_active: bool,
    pub is_passport_active: bool,
    #[serde(rename = "masterID")]
    pub master_id: Option<Uuid>,
    #[serde(serialize_with = "zakaion_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "zakaion_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            middle_name: user.middle_name,
            phone_number: user.phone_number,
            email: user.email,
            role: user.role,
            is_phone_active: user.is_phone_active,
            is_email_active: user.is_email_active,
            is_passport_active: user.is_passport_active,
            master_id: user.master_id,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Push-notification device registered by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDevice {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub fcm_token: String,
    pub created_at: DateTime<Utc>,
}

/// Mask an address for logs: `+155****4567`, `an***@example.com`.
pub fn mask_address(address: &str) -> String {
    if let Some((local, domain)) = address.split_once('@') {
        let head: String = local.chars().take(2).collect();
        return format!("{head}***@{domain}");
    }
    let chars: Vec<char> = address.chars().collect();
    if chars.len() >= 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}****{tail}")
    } else {
        "****".to_owned()
    }
}
