//! Domain events and notification fan-out.
//!
//! - [`DomainEvent`] -- what happened (an accepted transition or a creation).
//! - [`EventQueue`] -- bounded, non-blocking publisher handed to handlers.
//! - [`fan_out`] -- the pure rule table turning one event into notification drafts.
//!
//! The consumer side (the task that persists the drafts) lives in the API crate.

pub mod bus;
pub mod fanout;

pub use bus::{Command, DomainEvent, EventQueue};
pub use fanout::fan_out;
