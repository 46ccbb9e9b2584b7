//! Notification vocabulary and role-scoped visibility rules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

/// Maximum number of notifications returned by a listing.
pub const NOTIFICATION_LIST_LIMIT: i64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Booking,
    Maintenance,
    System,
    Service,
    Payment,
}

impl NotificationType {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationType::Booking => "booking",
            NotificationType::Maintenance => "maintenance",
            NotificationType::System => "system",
            NotificationType::Service => "service",
            NotificationType::Payment => "payment",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "booking" => Ok(NotificationType::Booking),
            "maintenance" => Ok(NotificationType::Maintenance),
            "system" => Ok(NotificationType::System),
            "service" => Ok(NotificationType::Service),
            "payment" => Ok(NotificationType::Payment),
            other => Err(CoreError::Validation(format!(
                "Unknown notification type '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for NotificationType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Audience of a notification.
///
/// `Reception` only exists on legacy rows; new notifications for the front
/// desk always use `Receptionist`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientRole {
    Admin,
    Manager,
    Receptionist,
    Reception,
    Staff,
    Guest,
    All,
}

impl RecipientRole {
    pub fn as_str(self) -> &'static str {
        match self {
            RecipientRole::Admin => "admin",
            RecipientRole::Manager => "manager",
            RecipientRole::Receptionist => "receptionist",
            RecipientRole::Reception => "reception",
            RecipientRole::Staff => "staff",
            RecipientRole::Guest => "guest",
            RecipientRole::All => "all",
        }
    }
}

impl fmt::Display for RecipientRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecipientRole {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(RecipientRole::Admin),
            "manager" => Ok(RecipientRole::Manager),
            "receptionist" => Ok(RecipientRole::Receptionist),
            "reception" => Ok(RecipientRole::Reception),
            "staff" => Ok(RecipientRole::Staff),
            "guest" => Ok(RecipientRole::Guest),
            "all" => Ok(RecipientRole::All),
            other => Err(CoreError::Validation(format!(
                "Unknown recipient role '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for RecipientRole {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Role> for RecipientRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => RecipientRole::Admin,
            Role::Manager => RecipientRole::Manager,
            Role::Receptionist => RecipientRole::Receptionist,
            // Housekeeping has no audience of its own; it reads staff rows.
            Role::Housekeeping | Role::Staff => RecipientRole::Staff,
            Role::Guest => RecipientRole::Guest,
        }
    }
}

/// A notification to be inserted. Produced only by the fan-out rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNotification {
    pub notification_type: NotificationType,
    pub recipient_role: RecipientRole,
    /// Narrows the role audience to one identity.
    pub user_id: Option<DbId>,
    pub message: String,
    /// Id of the entity that triggered the notification.
    pub reference_id: Option<DbId>,
}

/// Which notification rows an identity may read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationScope {
    /// `recipient_role` in {admin, all} or unset.
    Admin,
    /// `recipient_role = guest` and `user_id` = the guest.
    Guest { user_id: DbId },
    /// `recipient_role` in `roles`, and either no `user_id` or this user.
    Staff { user_id: DbId, roles: Vec<RecipientRole> },
}

impl NotificationScope {
    pub fn for_identity(role: Role, user_id: DbId) -> Self {
        match role {
            Role::Admin => NotificationScope::Admin,
            Role::Guest => NotificationScope::Guest { user_id },
            other => {
                let mut roles = vec![RecipientRole::from(other)];
                if other == Role::Receptionist {
                    roles.push(RecipientRole::Reception);
                }
                for shared in [RecipientRole::Staff, RecipientRole::All] {
                    if !roles.contains(&shared) {
                        roles.push(shared);
                    }
                }
                NotificationScope::Staff { user_id, roles }
            }
        }
    }

    /// Row-level predicate equivalent to the SQL filter in the notification repo.
    pub fn matches(&self, recipient_role: Option<RecipientRole>, user_id: Option<DbId>) -> bool {
        match self {
            NotificationScope::Admin => matches!(
                recipient_role,
                None | Some(RecipientRole::Admin) | Some(RecipientRole::All)
            ),
            NotificationScope::Guest { user_id: me } => {
                recipient_role == Some(RecipientRole::Guest) && user_id == Some(*me)
            }
            NotificationScope::Staff { user_id: me, roles } => {
                recipient_role.is_some_and(|r| roles.contains(&r))
                    && user_id.map_or(true, |id| id == *me)
            }
        }
    }
}
