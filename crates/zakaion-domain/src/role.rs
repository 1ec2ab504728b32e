//! User role types.

use serde::{Deserialize, Serialize};

/// Marketplace role of a user account.
///
/// Wire format: `u8` in declaration order (0 = SuperAdmin … 5 = Executor).
/// JSON format: `SCREAMING_SNAKE_CASE` name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin = 0,
    Admin = 1,
    Editor = 2,
    Partner = 3,
    Client = 4,
    Executor = 5,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::SuperAdmin,
        Role::Admin,
        Role::Editor,
        Role::Partner,
        Role::Client,
        Role::Executor,
    ];

    /// Convert from `u8` wire value. Returns `None` for unknown values.
    pub fn from_u8(v: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_u8() == v)
    }

    /// Convert to `u8` wire value.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Lowercase URL segment used by the role-scoped routes (`/client/list`, …).
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::SuperAdmin => "super-admin",
            Self::Admin => "admin",
            Self::Editor => "editor",
            Self::Partner => "partner",
            Self::Client => "client",
            Self::Executor => "executor",
        }
    }

    pub fn from_path_segment(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.path_segment() == s)
    }
}
