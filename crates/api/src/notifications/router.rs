//! Event-to-notification worker.
//!
//! [`NotificationRouter`] consumes [`Command`]s from the event queue, turns
//! each [`DomainEvent`] into drafts with [`fan_out`], and inserts them. Every
//! draft is written independently; a failed insert is logged and the rest
//! still go through.

use std::sync::Arc;

use futures::future::join_all;
use hotelops_db::NotificationStore;
use hotelops_events::{fan_out, Command, DomainEvent};
use tokio::sync::mpsc;

/// Persists the notifications produced by domain events.
pub struct NotificationRouter {
    store: Arc<dyn NotificationStore>,
}

impl NotificationRouter {
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    /// Run the routing loop.
    ///
    /// Exits once every [`EventQueue`](hotelops_events::EventQueue) handle has
    /// been dropped and the queue is drained.
    pub async fn run(self, mut receiver: mpsc::Receiver<Command>) {
        while let Some(command) = receiver.recv().await {
            match command {
                Command::Event(event) => {
                    self.route_event(&event).await;
                }
                Command::Flush(done) => {
                    let _ = done.send(());
                }
            }
        }
        tracing::info!("Event queue closed, notification router shutting down");
    }

    /// Insert every notification `event` fans out to. Returns how many were
    /// stored.
    pub async fn route_event(&self, event: &DomainEvent) -> usize {
        let drafts = fan_out(event);
        if drafts.is_empty() {
            return 0;
        }

        let results = join_all(
            drafts
                .iter()
                .map(|draft| self.store.create_notification(draft)),
        )
        .await;

        let mut stored = 0;
        for (draft, result) in drafts.iter().zip(results) {
            match result {
                Ok(_) => stored += 1,
                Err(e) => tracing::error!(
                    error = %e,
                    event = event.name(),
                    recipient_role = %draft.recipient_role,
                    "Failed to store notification"
                ),
            }
        }
        tracing::debug!(event = event.name(), stored, total = drafts.len(), "Event routed");
        stored
    }
}

#[cfg(test)]
mod tests {
    use hotelops_core::notification::{NotificationScope, RecipientRole};
    use hotelops_core::roles::Role;
    use hotelops_core::status::RoomStatus;
    use hotelops_core::transition::TransitionAccepted;
    use hotelops_db::MemoryStore;
    use hotelops_events::EventQueue;

    use super::*;

    fn room_ready(room_id: i64) -> DomainEvent {
        DomainEvent::RoomTransition {
            room_number: "101".into(),
            transition: TransitionAccepted {
                entity_id: room_id,
                from: RoomStatus::Booked,
                to: RoomStatus::Available,
            },
        }
    }

    #[tokio::test]
    async fn route_event_stores_one_row_per_target() {
        let store = Arc::new(MemoryStore::new());
        let router = NotificationRouter::new(store.clone());

        assert_eq!(router.route_event(&room_ready(1)).await, 2);

        let scope = NotificationScope::for_identity(Role::Manager, 7);
        let rows = store.list_notifications(&scope, 50).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].recipient_role, Some(RecipientRole::Manager));
        assert_eq!(rows[0].reference_id, Some(1));
    }

    #[tokio::test]
    async fn run_answers_flush_after_earlier_events() {
        let store = Arc::new(MemoryStore::new());
        let (queue, rx) = EventQueue::new(8);
        let worker = tokio::spawn(NotificationRouter::new(store.clone()).run(rx));

        queue.publish(room_ready(1));
        queue.publish(room_ready(2));
        assert!(queue.flush().await);

        let admin = NotificationScope::for_identity(Role::Admin, 1);
        let receptionist = NotificationScope::for_identity(Role::Receptionist, 2);
        assert_eq!(store.unread_count(&admin).await.unwrap(), 0);
        assert_eq!(store.unread_count(&receptionist).await.unwrap(), 2);

        drop(queue);
        worker.await.unwrap();
    }
}
