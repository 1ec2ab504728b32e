//! Role-gated capability sets.
//!
//! Every mutating operation declares exactly one [`Capability`]; an actor may
//! invoke it only when its role is a member of that set.

use crate::role::Role;

/// Named group of roles permitted to invoke an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    SuperAdmin,
    SuperAdminAdmin,
    SuperAdminAdminEditor,
    SuperAdminAdminEditorPartner,
}

impl Capability {
    pub fn roles(self) -> &'static [Role] {
        match self {
            Self::SuperAdmin => &[Role::SuperAdmin],
            Self::SuperAdminAdmin => &[Role::SuperAdmin, Role::Admin],
            Self::SuperAdminAdminEditor => &[Role::SuperAdmin, Role::Admin, Role::Editor],
            Self::SuperAdminAdminEditorPartner => {
                &[Role::SuperAdmin, Role::Admin, Role::Editor, Role::Partner]
            }
        }
    }

    pub fn allows(self, role: Role) -> bool {
        self.roles().contains(&role)
    }
}

/// Operations available on the users of one managed role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleAction {
    List,
    Add,
    Delete,
}

/// Required capability for `action` on users of `managed` role.
///
/// Returns `None` for roles that cannot be managed through the role-scoped
/// endpoints (super admins).
pub fn required_capability(managed: Role, action: RoleAction) -> Option<Capability> {
    use Capability::*;
    use RoleAction::*;

    let capability = match (managed, action) {
        (Role::SuperAdmin, _) => return None,
        (Role::Admin, _) => SuperAdmin,
        (Role::Editor, _) => SuperAdminAdmin,
        (Role::Partner | Role::Executor, _) => SuperAdminAdminEditor,
        (Role::Client, List | Add) => SuperAdminAdminEditorPartner,
        (Role::Client, Delete) => SuperAdminAdminEditor,
    };
    Some(capability)
}
