#![allow(async_fn_in_trait)]

use uuid::Uuid;

use zakaion_domain::pagination::{Page, PageRequest};
use zakaion_domain::role::Role;

use crate::domain::types::{Channel, User, UserDevice};
use crate::error::AccountsError;

/// Lookup and mutation of account records.
pub trait UserDirectory: Send + Sync {
    /// Record whose phone number or e-mail equals `address`.
    /// A registered record wins over a placeholder sharing the address.
    async fn find_by_address(&self, address: &str) -> Result<Option<User>, AccountsError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AccountsError>;

    /// Insert or update by id; returns the stored record.
    async fn save(&self, user: &User) -> Result<User, AccountsError>;

    /// Whether a non-placeholder record other than `excluding` owns `address`
    /// as phone number or e-mail. A blank address is never taken.
    async fn exists_with_address(
        &self,
        address: &str,
        excluding: Option<Uuid>,
    ) -> Result<bool, AccountsError>;
}

/// Role-scoped listing and removal.
pub trait RoleUserRepository: Send + Sync {
    /// Users of `role`, newest first. `master` narrows to records owned by a
    /// partner; `search` is a substring match on names, phone or e-mail.
    async fn list_by_role(
        &self,
        role: Role,
        master: Option<Uuid>,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<User>, AccountsError>;

    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, AccountsError>;
}

pub trait DeviceRepository: Send + Sync {
    async fn create(&self, device: &UserDevice) -> Result<(), AccountsError>;
}

/// Out-of-band delivery of one-time codes (SMS, e-mail).
pub trait CodeSender: Send + Sync {
    async fn send(&self, channel: Channel, address: &str, code: &str)
    -> Result<(), AccountsError>;
}

/// Record of redeemed challenge tokens.
pub trait ChallengeRegistry: Send + Sync {
    /// Mark `token` spent for `ttl_secs`. Returns `false` if it was already spent.
    async fn claim(&self, token: &str, ttl_secs: u64) -> Result<bool, AccountsError>;

    /// Undo a [`claim`](Self::claim) whose redemption could not be completed.
    async fn release(&self, token: &str) -> Result<(), AccountsError>;
}
