//! Notification delivery.
//!
//! The [`NotificationRouter`] drains the event queue and persists the
//! notifications each event fans out to.

pub mod router;

pub use router::NotificationRouter;
