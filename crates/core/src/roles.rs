//! Roles, account states, and the role → permission matrix.
//!
//! Role names must match the `CHECK` constraint in the `users` migration.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_RECEPTIONIST: &str = "receptionist";
pub const ROLE_HOUSEKEEPING: &str = "housekeeping";
pub const ROLE_STAFF: &str = "staff";
pub const ROLE_GUEST: &str = "guest";

/// The role an identity holds. Immutable after assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    Receptionist,
    Housekeeping,
    Staff,
    Guest,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Admin,
        Role::Manager,
        Role::Receptionist,
        Role::Housekeeping,
        Role::Staff,
        Role::Guest,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::Manager => ROLE_MANAGER,
            Role::Receptionist => ROLE_RECEPTIONIST,
            Role::Housekeeping => ROLE_HOUSEKEEPING,
            Role::Staff => ROLE_STAFF,
            Role::Guest => ROLE_GUEST,
        }
    }

    /// Every role except `guest` works for the hotel.
    pub fn is_staff(self) -> bool {
        !matches!(self, Role::Guest)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_ADMIN => Ok(Role::Admin),
            ROLE_MANAGER => Ok(Role::Manager),
            ROLE_RECEPTIONIST => Ok(Role::Receptionist),
            ROLE_HOUSEKEEPING => Ok(Role::Housekeeping),
            ROLE_STAFF => Ok(Role::Staff),
            ROLE_GUEST => Ok(Role::Guest),
            other => Err(CoreError::Validation(format!("Unknown role '{other}'"))),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Whether an identity may use the system. Only admins change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Inactive,
    Suspended,
}

impl AccountStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
            AccountStatus::Suspended => "suspended",
        }
    }

    /// Liveness check applied after token verification.
    pub fn ensure_active(self) -> Result<(), CoreError> {
        match self {
            AccountStatus::Active => Ok(()),
            other => Err(CoreError::AccountInactive(other)),
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AccountStatus::Active),
            "inactive" => Ok(AccountStatus::Inactive),
            "suspended" => Ok(AccountStatus::Suspended),
            other => Err(CoreError::Validation(format!(
                "Unknown account status '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for AccountStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Route-level allow-list check. Fails closed.
pub fn authorize(role: Role, allowed: &[Role]) -> Result<(), CoreError> {
    if allowed.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "Role '{role}' is not permitted to perform this action"
        )))
    }
}

// ---------------------------------------------------------------------------
// Permissions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewDashboard,
    ManageRooms,
    ManageBookings,
    ViewReports,
    ManageHousekeeping,
    MakeBookings,
}

impl Permission {
    pub const ALL: [Permission; 6] = [
        Permission::ViewDashboard,
        Permission::ManageRooms,
        Permission::ManageBookings,
        Permission::ViewReports,
        Permission::ManageHousekeeping,
        Permission::MakeBookings,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Permission::ViewDashboard => "view_dashboard",
            Permission::ManageRooms => "manage_rooms",
            Permission::ManageBookings => "manage_bookings",
            Permission::ViewReports => "view_reports",
            Permission::ManageHousekeeping => "manage_housekeeping",
            Permission::MakeBookings => "make_bookings",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a single role is granted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grant {
    /// Wildcard entry: satisfies every permission.
    All,
    Only(HashSet<Permission>),
}

impl Grant {
    fn allows(&self, permission: Permission) -> bool {
        match self {
            Grant::All => true,
            Grant::Only(set) => set.contains(&permission),
        }
    }
}

/// Immutable role → permission table.
///
/// Built once at startup and shared behind an `Arc`; there is no API to
/// mutate it afterwards. Roles missing from the table are granted nothing.
#[derive(Debug, Clone)]
pub struct PermissionMatrix {
    grants: HashMap<Role, Grant>,
}

impl PermissionMatrix {
    pub fn new(grants: HashMap<Role, Grant>) -> Self {
        Self { grants }
    }

    pub fn check_permission(&self, role: Role, permission: Permission) -> bool {
        self.grants
            .get(&role)
            .is_some_and(|grant| grant.allows(permission))
    }

    /// Like [`check_permission`](Self::check_permission) but as a `Forbidden` error.
    pub fn require(&self, role: Role, permission: Permission) -> Result<(), CoreError> {
        if self.check_permission(role, permission) {
            Ok(())
        } else {
            Err(CoreError::Forbidden(format!(
                "Role '{role}' lacks the '{permission}' permission"
            )))
        }
    }
}

impl Default for PermissionMatrix {
    fn default() -> Self {
        use Permission::*;

        let only = |perms: &[Permission]| Grant::Only(perms.iter().copied().collect());

        let grants = HashMap::from([
            (Role::Admin, Grant::All),
            (
                Role::Manager,
                only(&[
                    ViewDashboard,
                    ManageRooms,
                    ManageBookings,
                    ViewReports,
                    ManageHousekeeping,
                ]),
            ),
            (
                Role::Receptionist,
                only(&[ViewDashboard, ManageBookings, MakeBookings]),
            ),
            (Role::Housekeeping, only(&[ViewDashboard, ManageHousekeeping])),
            (Role::Staff, only(&[ViewDashboard, ManageHousekeeping])),
            (Role::Guest, only(&[MakeBookings])),
        ]);

        Self::new(grants)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn authorize_fails_closed_for_every_pair() {
        let subsets: [&[Role]; 4] = [
            &[],
            &[Role::Admin],
            &[Role::Admin, Role::Manager, Role::Receptionist],
            &Role::ALL,
        ];
        for allowed in subsets {
            for role in Role::ALL {
                let result = authorize(role, allowed);
                if allowed.contains(&role) {
                    assert!(result.is_ok(), "{role} should pass {allowed:?}");
                } else {
                    assert_matches!(result, Err(CoreError::Forbidden(_)));
                }
            }
        }
    }

    #[test]
    fn admin_has_every_permission() {
        let matrix = PermissionMatrix::default();
        for permission in Permission::ALL {
            assert!(matrix.check_permission(Role::Admin, permission));
        }
    }

    #[test]
    fn guest_cannot_manage_rooms() {
        let matrix = PermissionMatrix::default();
        assert!(!matrix.check_permission(Role::Guest, Permission::ManageRooms));
        assert!(matrix.check_permission(Role::Guest, Permission::MakeBookings));
        assert_matches!(
            matrix.require(Role::Guest, Permission::ManageRooms),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn non_admin_roles_need_exact_membership() {
        let matrix = PermissionMatrix::default();
        assert!(matrix.check_permission(Role::Manager, Permission::ManageRooms));
        assert!(!matrix.check_permission(Role::Manager, Permission::MakeBookings));
        assert!(matrix.check_permission(Role::Receptionist, Permission::MakeBookings));
        assert!(!matrix.check_permission(Role::Housekeeping, Permission::ManageBookings));
    }

    #[test]
    fn roles_missing_from_a_custom_matrix_get_nothing() {
        let matrix = PermissionMatrix::new(HashMap::from([(Role::Admin, Grant::All)]));
        assert!(!matrix.check_permission(Role::Manager, Permission::ViewDashboard));
    }

    #[test]
    fn account_status_liveness() {
        assert!(AccountStatus::Active.ensure_active().is_ok());
        assert_matches!(
            AccountStatus::Suspended.ensure_active(),
            Err(CoreError::AccountInactive(AccountStatus::Suspended))
        );
        assert_matches!(
            AccountStatus::Inactive.ensure_active(),
            Err(CoreError::AccountInactive(AccountStatus::Inactive))
        );
    }
}
