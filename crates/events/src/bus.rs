//! Bounded event queue between request handlers and the notification worker.
//!
//! Handlers call [`EventQueue::publish`] after their primary write has been
//! persisted. Publishing never waits: a full or closed queue drops the event
//! with a warning, because notifications are a best-effort side effect.

use hotelops_core::service_request::ServiceRequestType;
use hotelops_core::status::{BookingStatus, PaymentStatus, RoomStatus, ServiceRequestStatus};
use hotelops_core::transition::TransitionAccepted;
use hotelops_core::types::DbId;
use tokio::sync::{mpsc, oneshot};

// ---------------------------------------------------------------------------
// DomainEvent
// ---------------------------------------------------------------------------

/// Something that happened to a trackable entity.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainEvent {
    RoomTransition {
        room_number: String,
        transition: TransitionAccepted<RoomStatus>,
    },
    BookingCreated {
        booking_id: DbId,
        guest_id: DbId,
        room_number: String,
    },
    BookingTransition {
        guest_id: DbId,
        transition: TransitionAccepted<BookingStatus>,
    },
    PaymentCreated {
        payment_id: DbId,
        booking_id: DbId,
        user_id: DbId,
        amount: f64,
        status: PaymentStatus,
    },
    PaymentTransition {
        user_id: DbId,
        transition: TransitionAccepted<PaymentStatus>,
    },
    ServiceRequestCreated {
        request_id: DbId,
        request_type: ServiceRequestType,
        description: String,
    },
    ServiceRequestTransition {
        reported_by: DbId,
        transition: TransitionAccepted<ServiceRequestStatus>,
    },
    ServiceRequestAssigned {
        request_id: DbId,
        assignee_id: DbId,
    },
}

impl DomainEvent {
    /// Dot-separated name used in log fields, e.g. `"room.transition"`.
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::RoomTransition { .. } => "room.transition",
            DomainEvent::BookingCreated { .. } => "booking.created",
            DomainEvent::BookingTransition { .. } => "booking.transition",
            DomainEvent::PaymentCreated { .. } => "payment.created",
            DomainEvent::PaymentTransition { .. } => "payment.transition",
            DomainEvent::ServiceRequestCreated { .. } => "service_request.created",
            DomainEvent::ServiceRequestTransition { .. } => "service_request.transition",
            DomainEvent::ServiceRequestAssigned { .. } => "service_request.assigned",
        }
    }
}

// ---------------------------------------------------------------------------
// EventQueue
// ---------------------------------------------------------------------------

/// Default number of queued commands before publishing starts dropping.
pub const DEFAULT_CAPACITY: usize = 256;

/// Message carried by the queue.
#[derive(Debug)]
pub enum Command {
    Event(DomainEvent),
    /// Barrier: answered once every command queued before it was handled.
    Flush(oneshot::Sender<()>),
}

/// Sending half of the notification queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct EventQueue {
    sender: mpsc::Sender<Command>,
}

impl EventQueue {
    /// Create a queue holding at most `capacity` commands (minimum 1).
    ///
    /// The receiver goes to the single worker that drains the queue.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Command>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    /// Enqueue an event without waiting.
    pub fn publish(&self, event: DomainEvent) {
        let name = event.name();
        match self.sender.try_send(Command::Event(event)) {
            Ok(()) => tracing::debug!(event = name, "Event queued"),
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(event = name, "Notification queue full, event dropped");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::warn!(event = name, "Notification queue closed, event dropped");
            }
        }
    }

    /// Wait until everything published before this call has been processed.
    ///
    /// Returns `false` if the worker is gone.
    pub async fn flush(&self) -> bool {
        let (tx, rx) = oneshot::channel();
        if self.sender.send(Command::Flush(tx)).await.is_err() {
            return false;
        }
        rx.await.is_ok()
    }
}

impl Default for EventQueue {
    /// A queue whose receiver is already dropped; every publish is a no-op
    /// apart from the warning.
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY).0
    }
}
