//! Status transition validation.
//!
//! [`validate_transition`] is the single gate every status change passes
//! through. By default every status set is a fully connected graph and only
//! no-op transitions are rejected; [`TransitionPolicy::Strict`] switches to
//! the forward-only tables defined on each [`EntityStatus`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::status::{EntityKind, EntityStatus};
use crate::types::DbId;

/// How strictly transitions are checked beyond the no-op rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// Any status may follow any other status.
    #[default]
    Permissive,
    /// Only the edges in [`EntityStatus::strict_allows`] are legal.
    Strict,
}

impl FromStr for TransitionPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(TransitionPolicy::Permissive),
            "strict" => Ok(TransitionPolicy::Strict),
            other => Err(CoreError::Validation(format!(
                "Unknown transition policy '{other}'"
            ))),
        }
    }
}

/// An accepted status change, emitted once the new status is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionAccepted<S> {
    pub entity_id: DbId,
    pub from: S,
    pub to: S,
}

impl<S: EntityStatus> TransitionAccepted<S> {
    pub fn kind(&self) -> EntityKind {
        S::KIND
    }
}

/// Result of validating an update request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome<S> {
    /// The primary status changes.
    Changed(TransitionAccepted<S>),
    /// The status is unchanged but a secondary field (e.g. `is_available`)
    /// changes, so the update proceeds without a transition event.
    SecondaryOnly,
}

impl<S> TransitionOutcome<S> {
    pub fn accepted(&self) -> Option<&TransitionAccepted<S>> {
        match self {
            TransitionOutcome::Changed(t) => Some(t),
            TransitionOutcome::SecondaryOnly => None,
        }
    }
}

/// Parse `requested` and check it against `current`.
///
/// - unknown status → [`CoreError::InvalidStatus`]
/// - same status, nothing else changing → [`CoreError::NoOpTransition`]
/// - same status, secondary field changing → [`TransitionOutcome::SecondaryOnly`]
/// - edge missing from the strict table → [`CoreError::IllegalTransition`]
pub fn validate_transition<S: EntityStatus>(
    entity_id: DbId,
    current: S,
    requested: &str,
    secondary_changed: bool,
    policy: TransitionPolicy,
) -> Result<TransitionOutcome<S>, CoreError> {
    let next: S = requested.trim().parse()?;
    check_transition(entity_id, current, next, secondary_changed, policy)
}

/// Same as [`validate_transition`] for an already-typed target status.
pub fn check_transition<S: EntityStatus>(
    entity_id: DbId,
    current: S,
    next: S,
    secondary_changed: bool,
    policy: TransitionPolicy,
) -> Result<TransitionOutcome<S>, CoreError> {
    if next == current {
        if secondary_changed {
            return Ok(TransitionOutcome::SecondaryOnly);
        }
        return Err(CoreError::NoOpTransition {
            entity: S::KIND,
            current: current.as_str().to_string(),
        });
    }

    if policy == TransitionPolicy::Strict && !current.strict_allows(next) {
        return Err(CoreError::IllegalTransition {
            entity: S::KIND,
            from: current.as_str().to_string(),
            to: next.as_str().to_string(),
        });
    }

    Ok(TransitionOutcome::Changed(TransitionAccepted {
        entity_id,
        from: current,
        to: next,
    }))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::status::{BookingStatus, PaymentStatus, RoomStatus, ServiceRequestStatus};

    #[test]
    fn permissive_accepts_any_distinct_pair() {
        fn check_all<S: EntityStatus>() {
            for &from in S::all() {
                for &to in S::all() {
                    let result =
                        check_transition(1, from, to, false, TransitionPolicy::Permissive);
                    if from == to {
                        assert_matches!(result, Err(CoreError::NoOpTransition { .. }));
                    } else {
                        assert_matches!(result, Ok(TransitionOutcome::Changed(_)));
                    }
                }
            }
        }
        check_all::<RoomStatus>();
        check_all::<BookingStatus>();
        check_all::<PaymentStatus>();
        check_all::<ServiceRequestStatus>();
    }

    #[test]
    fn permissive_allows_checked_out_back_to_reserved() {
        let outcome = validate_transition(
            9,
            BookingStatus::CheckedOut,
            "reserved",
            false,
            TransitionPolicy::Permissive,
        )
        .unwrap();
        assert_eq!(
            outcome.accepted().map(|t| t.to),
            Some(BookingStatus::Pending)
        );
    }

    #[test]
    fn no_op_reports_current_status() {
        let err = validate_transition(
            101,
            RoomStatus::Available,
            "available",
            false,
            TransitionPolicy::Permissive,
        )
        .unwrap_err();
        assert_matches!(
            err,
            CoreError::NoOpTransition { entity: EntityKind::Room, current } if current == "available"
        );
    }

    #[test]
    fn secondary_change_lets_same_status_through() {
        let outcome = validate_transition(
            101,
            RoomStatus::Available,
            "available",
            true,
            TransitionPolicy::Permissive,
        )
        .unwrap();
        assert_eq!(outcome, TransitionOutcome::SecondaryOnly);
        assert!(outcome.accepted().is_none());
    }

    #[test]
    fn unknown_status_is_rejected_before_anything_else() {
        assert_matches!(
            validate_transition(
                1,
                PaymentStatus::Pending,
                "lost",
                true,
                TransitionPolicy::Permissive
            ),
            Err(CoreError::InvalidStatus { entity: EntityKind::Payment, .. })
        );
    }

    #[test]
    fn strict_policy_rejects_backward_edges() {
        assert_matches!(
            validate_transition(
                3,
                BookingStatus::CheckedOut,
                "pending",
                false,
                TransitionPolicy::Strict
            ),
            Err(CoreError::IllegalTransition { entity: EntityKind::Booking, .. })
        );
        let ok = validate_transition(
            3,
            BookingStatus::CheckedIn,
            "checked_out",
            false,
            TransitionPolicy::Strict,
        )
        .unwrap();
        let accepted = ok.accepted().copied().unwrap();
        assert_eq!(accepted.kind(), EntityKind::Booking);
        assert_eq!(accepted.from, BookingStatus::CheckedIn);
        assert_eq!(accepted.entity_id, 3);
    }

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!(
            "STRICT".parse::<TransitionPolicy>().unwrap(),
            TransitionPolicy::Strict
        );
        assert_eq!(TransitionPolicy::default(), TransitionPolicy::Permissive);
        assert!("lenient".parse::<TransitionPolicy>().is_err());
    }
}
