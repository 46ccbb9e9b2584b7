//! Event → notification rule table.
//!
//! Every target is its own [`NewNotification`]. Events without a rule map
//! to an empty list.

use hotelops_core::notification::{NewNotification, NotificationType, RecipientRole};
use hotelops_core::status::{PaymentStatus, RoomStatus};
use hotelops_core::types::DbId;

use crate::bus::DomainEvent;

fn draft(
    notification_type: NotificationType,
    recipient_role: RecipientRole,
    user_id: Option<DbId>,
    message: &str,
    reference_id: DbId,
) -> NewNotification {
    NewNotification {
        notification_type,
        recipient_role,
        user_id,
        message: message.to_string(),
        reference_id: Some(reference_id),
    }
}

/// Compute the notifications an event produces.
pub fn fan_out(event: &DomainEvent) -> Vec<NewNotification> {
    use NotificationType as T;
    use RecipientRole as R;

    match event {
        DomainEvent::RoomTransition {
            room_number,
            transition,
        } => {
            let id = transition.entity_id;
            match transition.to {
                RoomStatus::Cleaning => {
                    let msg = format!("Room {room_number} needs cleaning");
                    vec![draft(T::System, R::Staff, None, &msg, id)]
                }
                RoomStatus::Available => {
                    let msg = format!("Room {room_number} is ready for check-in");
                    vec![
                        draft(T::System, R::Receptionist, None, &msg, id),
                        draft(T::System, R::Manager, None, &msg, id),
                    ]
                }
                RoomStatus::UnderMaintenance => {
                    let msg = format!("Room {room_number} is under maintenance");
                    vec![
                        draft(T::Maintenance, R::Admin, None, &msg, id),
                        draft(T::Maintenance, R::Manager, None, &msg, id),
                    ]
                }
                RoomStatus::Booked => Vec::new(),
            }
        }

        DomainEvent::BookingCreated {
            booking_id,
            room_number,
            ..
        } => {
            let msg = format!("New booking #{booking_id} for room {room_number}");
            vec![
                draft(T::Booking, R::Receptionist, None, &msg, *booking_id),
                draft(T::Booking, R::Manager, None, &msg, *booking_id),
            ]
        }

        DomainEvent::BookingTransition {
            guest_id,
            transition,
        } => {
            let msg = format!(
                "Your booking #{} is now {}",
                transition.entity_id, transition.to
            );
            vec![draft(
                T::Booking,
                R::Guest,
                Some(*guest_id),
                &msg,
                transition.entity_id,
            )]
        }

        DomainEvent::PaymentCreated {
            payment_id,
            booking_id,
            user_id,
            amount,
            status,
        } => {
            let admin_msg =
                format!("Payment #{payment_id} of {amount:.2} received for booking #{booking_id}");
            let guest_msg =
                format!("Your payment of {amount:.2} for booking #{booking_id} is {status}");
            vec![
                draft(T::System, R::Admin, None, &admin_msg, *payment_id),
                draft(T::Payment, R::Guest, Some(*user_id), &guest_msg, *payment_id),
            ]
        }

        DomainEvent::PaymentTransition {
            user_id,
            transition,
        } => match transition.to {
            PaymentStatus::Failed | PaymentStatus::Cancelled | PaymentStatus::Refunded => {
                let id = transition.entity_id;
                let guest_msg = format!("Your payment #{id} was {}", transition.to);
                let staff_msg = format!(
                    "Payment #{id} changed from {} to {}",
                    transition.from, transition.to
                );
                vec![
                    draft(T::Payment, R::Guest, Some(*user_id), &guest_msg, id),
                    draft(T::System, R::Admin, None, &staff_msg, id),
                    draft(T::System, R::Manager, None, &staff_msg, id),
                ]
            }
            PaymentStatus::Pending | PaymentStatus::Completed => Vec::new(),
        },

        DomainEvent::ServiceRequestCreated {
            request_id,
            request_type,
            description,
        } => {
            let msg = format!("New {request_type} request #{request_id}: {description}");
            let kind = request_type.notification_type();
            [R::Admin, R::Manager, R::Staff]
                .into_iter()
                .map(|role| draft(kind, role, None, &msg, *request_id))
                .collect()
        }

        DomainEvent::ServiceRequestTransition {
            reported_by,
            transition,
        } => {
            let msg = format!(
                "Your request #{} is now {}",
                transition.entity_id, transition.to
            );
            vec![draft(
                T::Service,
                R::Guest,
                Some(*reported_by),
                &msg,
                transition.entity_id,
            )]
        }

        DomainEvent::ServiceRequestAssigned {
            request_id,
            assignee_id,
        } => {
            let msg = format!("Service request #{request_id} has been assigned to you");
            vec![draft(
                T::Service,
                R::Staff,
                Some(*assignee_id),
                &msg,
                *request_id,
            )]
        }
    }
}

#[cfg(test)]
mod tests {
    use hotelops_core::service_request::ServiceRequestType;
    use hotelops_core::status::{BookingStatus, ServiceRequestStatus};
    use hotelops_core::transition::TransitionAccepted;

    use super::*;

    fn room(from: RoomStatus, to: RoomStatus) -> DomainEvent {
        DomainEvent::RoomTransition {
            room_number: "101".to_string(),
            transition: TransitionAccepted {
                entity_id: 1,
                from,
                to,
            },
        }
    }

    fn audiences(drafts: &[NewNotification]) -> Vec<(RecipientRole, Option<DbId>)> {
        drafts.iter().map(|d| (d.recipient_role, d.user_id)).collect()
    }

    #[test]
    fn room_available_alerts_front_desk_and_manager() {
        let drafts = fan_out(&room(RoomStatus::Booked, RoomStatus::Available));
        assert_eq!(
            audiences(&drafts),
            [(RecipientRole::Receptionist, None), (RecipientRole::Manager, None)]
        );
        assert!(drafts
            .iter()
            .all(|d| d.message == "Room 101 is ready for check-in"
                && d.notification_type == NotificationType::System));
    }

    #[test]
    fn room_maintenance_alerts_exactly_admin_and_manager() {
        let drafts = fan_out(&room(RoomStatus::Available, RoomStatus::UnderMaintenance));
        assert_eq!(
            audiences(&drafts),
            [(RecipientRole::Admin, None), (RecipientRole::Manager, None)]
        );
        assert!(drafts.iter().all(|d| d.reference_id == Some(1)
            && d.notification_type == NotificationType::Maintenance));
    }

    #[test]
    fn room_cleaning_alerts_staff_and_booked_is_silent() {
        let drafts = fan_out(&room(RoomStatus::Booked, RoomStatus::Cleaning));
        assert_eq!(audiences(&drafts), [(RecipientRole::Staff, None)]);
        assert!(fan_out(&room(RoomStatus::Available, RoomStatus::Booked)).is_empty());
    }

    #[test]
    fn payment_created_alerts_admin_and_payer() {
        let drafts = fan_out(&DomainEvent::PaymentCreated {
            payment_id: 4,
            booking_id: 2,
            user_id: 7,
            amount: 240.0,
            status: PaymentStatus::Completed,
        });
        assert_eq!(
            audiences(&drafts),
            [(RecipientRole::Admin, None), (RecipientRole::Guest, Some(7))]
        );
        assert_eq!(drafts[1].notification_type, NotificationType::Payment);
        assert_eq!(
            drafts[1].message,
            "Your payment of 240.00 for booking #2 is completed"
        );
    }

    #[test]
    fn only_unhappy_payment_transitions_notify() {
        let event = |to| DomainEvent::PaymentTransition {
            user_id: 7,
            transition: TransitionAccepted {
                entity_id: 4,
                from: PaymentStatus::Pending,
                to,
            },
        };
        for to in [
            PaymentStatus::Failed,
            PaymentStatus::Cancelled,
            PaymentStatus::Refunded,
        ] {
            assert_eq!(
                audiences(&fan_out(&event(to))),
                [
                    (RecipientRole::Guest, Some(7)),
                    (RecipientRole::Admin, None),
                    (RecipientRole::Manager, None)
                ]
            );
        }
        assert!(fan_out(&event(PaymentStatus::Completed)).is_empty());
    }

    #[test]
    fn service_request_lifecycle() {
        let created = fan_out(&DomainEvent::ServiceRequestCreated {
            request_id: 3,
            request_type: ServiceRequestType::Maintenance,
            description: "Leaking tap".to_string(),
        });
        assert_eq!(created.len(), 3);
        assert!(created
            .iter()
            .all(|d| d.notification_type == NotificationType::Maintenance));

        let changed = fan_out(&DomainEvent::ServiceRequestTransition {
            reported_by: 7,
            transition: TransitionAccepted {
                entity_id: 3,
                from: ServiceRequestStatus::Pending,
                to: ServiceRequestStatus::InProgress,
            },
        });
        assert_eq!(audiences(&changed), [(RecipientRole::Guest, Some(7))]);
        assert_eq!(changed[0].message, "Your request #3 is now in_progress");

        let assigned = fan_out(&DomainEvent::ServiceRequestAssigned {
            request_id: 3,
            assignee_id: 11,
        });
        assert_eq!(audiences(&assigned), [(RecipientRole::Staff, Some(11))]);
    }

    #[test]
    fn bookings_notify_desk_on_create_and_owner_on_change() {
        let created = fan_out(&DomainEvent::BookingCreated {
            booking_id: 5,
            guest_id: 7,
            room_number: "101".to_string(),
        });
        assert_eq!(
            audiences(&created),
            [(RecipientRole::Receptionist, None), (RecipientRole::Manager, None)]
        );

        let changed = fan_out(&DomainEvent::BookingTransition {
            guest_id: 7,
            transition: TransitionAccepted {
                entity_id: 5,
                from: BookingStatus::Pending,
                to: BookingStatus::Confirmed,
            },
        });
        assert_eq!(audiences(&changed), [(RecipientRole::Guest, Some(7))]);
    }
}
