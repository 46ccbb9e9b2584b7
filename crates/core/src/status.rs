//! Closed status sets for every trackable entity.
//!
//! Each enum is stored as lowercase snake_case `TEXT`; the values must match
//! the `CHECK` constraints in the migrations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The four kinds of entity whose status is state-machine driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Room,
    Booking,
    Payment,
    ServiceRequest,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Room => "Room",
            EntityKind::Booking => "Booking",
            EntityKind::Payment => "Payment",
            EntityKind::ServiceRequest => "ServiceRequest",
        }
    }

    /// Stored names of every status this kind accepts.
    pub fn allowed_statuses(self) -> Vec<&'static str> {
        fn names<S: EntityStatus>() -> Vec<&'static str> {
            S::all().iter().map(|s| s.as_str()).collect()
        }
        match self {
            EntityKind::Room => names::<RoomStatus>(),
            EntityKind::Booking => names::<BookingStatus>(),
            EntityKind::Payment => names::<PaymentStatus>(),
            EntityKind::ServiceRequest => names::<ServiceRequestStatus>(),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Behaviour shared by every entity status enum.
pub trait EntityStatus:
    Copy + Eq + fmt::Debug + fmt::Display + FromStr<Err = CoreError> + 'static
{
    const KIND: EntityKind;

    /// Every member of the closed set, in lifecycle order.
    fn all() -> &'static [Self];

    fn as_str(self) -> &'static str;

    /// Statuses that close out the entity's work (`completed_at` is stamped).
    fn is_terminal(self) -> bool;

    /// Forward-only table used by the strict transition policy.
    fn strict_allows(self, next: Self) -> bool;
}

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:expr) {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $val $(, alias = $alias)*)] $variant ),+
        }

        impl $name {
            const VALUES: &'static [$name] = &[$($name::$variant),+];

            /// Return the stored string form.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $val ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $val $(| $alias)* => Ok($name::$variant), )+
                    other => Err(CoreError::InvalidStatus {
                        entity: $kind,
                        status: other.to_string(),
                    }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

define_status_enum! {
    /// Housekeeping/occupancy state of a room.
    RoomStatus (EntityKind::Room) {
        Available = "available",
        Booked = "booked",
        Cleaning = "cleaning",
        UnderMaintenance = "under_maintenance",
    }
}

define_status_enum! {
    /// Reservation lifecycle. `reserved` is accepted as an alias of `pending`.
    BookingStatus (EntityKind::Booking) {
        Pending = "pending" | "reserved",
        Confirmed = "confirmed",
        CheckedIn = "checked_in",
        CheckedOut = "checked_out",
        Cancelled = "cancelled",
    }
}

define_status_enum! {
    /// Payment settlement state.
    PaymentStatus (EntityKind::Payment) {
        Pending = "pending",
        Completed = "completed",
        Failed = "failed",
        Cancelled = "cancelled",
        Refunded = "refunded",
    }
}

define_status_enum! {
    /// Progress of a guest service or maintenance request.
    ServiceRequestStatus (EntityKind::ServiceRequest) {
        Pending = "pending",
        InProgress = "in_progress",
        Completed = "completed",
        Cancelled = "cancelled",
    }
}

impl EntityStatus for RoomStatus {
    const KIND: EntityKind = EntityKind::Room;

    fn all() -> &'static [Self] {
        Self::VALUES
    }

    fn as_str(self) -> &'static str {
        RoomStatus::as_str(self)
    }

    fn is_terminal(self) -> bool {
        false
    }

    fn strict_allows(self, next: Self) -> bool {
        use RoomStatus::*;
        match (self, next) {
            (Available, Booked | Cleaning | UnderMaintenance) => true,
            (Booked, Available | Cleaning) => true,
            (Cleaning, Available | UnderMaintenance) => true,
            (UnderMaintenance, Available | Cleaning) => true,
            (Available, Available)
            | (Booked, Booked | UnderMaintenance)
            | (Cleaning, Cleaning | Booked)
            | (UnderMaintenance, UnderMaintenance | Booked) => false,
        }
    }
}

impl EntityStatus for BookingStatus {
    const KIND: EntityKind = EntityKind::Booking;

    fn all() -> &'static [Self] {
        Self::VALUES
    }

    fn as_str(self) -> &'static str {
        BookingStatus::as_str(self)
    }

    fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::CheckedOut)
    }

    fn strict_allows(self, next: Self) -> bool {
        use BookingStatus::*;
        match (self, next) {
            (Pending, Confirmed | CheckedIn | Cancelled) => true,
            (Confirmed, CheckedIn | Cancelled) => true,
            (CheckedIn, CheckedOut) => true,
            (Pending, Pending | CheckedOut)
            | (Confirmed, Pending | Confirmed | CheckedOut)
            | (CheckedIn, Pending | Confirmed | CheckedIn | Cancelled)
            | (CheckedOut, _)
            | (Cancelled, _) => false,
        }
    }
}

impl EntityStatus for PaymentStatus {
    const KIND: EntityKind = EntityKind::Payment;

    fn all() -> &'static [Self] {
        Self::VALUES
    }

    fn as_str(self) -> &'static str {
        PaymentStatus::as_str(self)
    }

    fn is_terminal(self) -> bool {
        matches!(self, PaymentStatus::Completed)
    }

    fn strict_allows(self, next: Self) -> bool {
        use PaymentStatus::*;
        match (self, next) {
            (Pending, Completed | Failed | Cancelled) => true,
            (Completed, Refunded) => true,
            (Failed, Pending) => true,
            (Pending, Pending | Refunded)
            | (Completed, Pending | Completed | Failed | Cancelled)
            | (Failed, Completed | Failed | Cancelled | Refunded)
            | (Cancelled, _)
            | (Refunded, _) => false,
        }
    }
}

impl EntityStatus for ServiceRequestStatus {
    const KIND: EntityKind = EntityKind::ServiceRequest;

    fn all() -> &'static [Self] {
        Self::VALUES
    }

    fn as_str(self) -> &'static str {
        ServiceRequestStatus::as_str(self)
    }

    fn is_terminal(self) -> bool {
        matches!(self, ServiceRequestStatus::Completed)
    }

    fn strict_allows(self, next: Self) -> bool {
        use ServiceRequestStatus::*;
        match (self, next) {
            (Pending, InProgress | Completed | Cancelled) => true,
            (InProgress, Completed | Cancelled) => true,
            (Pending, Pending)
            | (InProgress, Pending | InProgress)
            | (Completed, _)
            | (Cancelled, _) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn booking_accepts_reserved_alias() {
        assert_eq!("reserved".parse::<BookingStatus>().unwrap(), BookingStatus::Pending);
        assert_eq!(BookingStatus::Pending.as_str(), "pending");

        let from_json: BookingStatus = serde_json::from_str("\"reserved\"").unwrap();
        assert_eq!(from_json, BookingStatus::Pending);
    }

    #[test]
    fn unknown_status_is_invalid_status() {
        assert_matches!(
            "demolished".parse::<RoomStatus>(),
            Err(CoreError::InvalidStatus { entity: EntityKind::Room, status }) if status == "demolished"
        );
    }

    #[test]
    fn allowed_statuses_list_canonical_names() {
        assert_eq!(
            EntityKind::Room.allowed_statuses(),
            ["available", "booked", "cleaning", "under_maintenance"]
        );
        assert!(!EntityKind::Booking.allowed_statuses().contains(&"reserved"));
    }

    #[test]
    fn serde_uses_snake_case_strings() {
        let json = serde_json::to_string(&RoomStatus::UnderMaintenance).unwrap();
        assert_eq!(json, "\"under_maintenance\"");
        let json = serde_json::to_string(&ServiceRequestStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn terminal_statuses() {
        assert!(BookingStatus::CheckedOut.is_terminal());
        assert!(PaymentStatus::Completed.is_terminal());
        assert!(ServiceRequestStatus::Completed.is_terminal());
        assert!(!BookingStatus::Cancelled.is_terminal());
        assert!(RoomStatus::all().iter().all(|s| !s.is_terminal()));
    }

    fn strict_never_allows_self<S: EntityStatus>() {
        for &s in S::all() {
            assert!(!s.strict_allows(s), "{s} -> {s} must not be allowed");
        }
    }

    #[test]
    fn strict_tables_reject_self_loops() {
        strict_never_allows_self::<RoomStatus>();
        strict_never_allows_self::<BookingStatus>();
        strict_never_allows_self::<PaymentStatus>();
        strict_never_allows_self::<ServiceRequestStatus>();
    }

    #[test]
    fn strict_booking_table_is_forward_only() {
        assert!(BookingStatus::Pending.strict_allows(BookingStatus::Confirmed));
        assert!(BookingStatus::CheckedIn.strict_allows(BookingStatus::CheckedOut));
        assert!(!BookingStatus::CheckedOut.strict_allows(BookingStatus::Pending));
        assert!(!BookingStatus::Cancelled.strict_allows(BookingStatus::Confirmed));
    }
}
