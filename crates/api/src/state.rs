use std::sync::Arc;

use hotelops_core::roles::PermissionMatrix;
use hotelops_core::transition::TransitionPolicy;
use hotelops_db::Stores;
use hotelops_events::EventQueue;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every field is an `Arc` or a channel handle.
#[derive(Clone)]
pub struct AppState {
    pub stores: Stores,
    pub config: Arc<ServerConfig>,
    /// Built once at startup; never mutated afterwards.
    pub permissions: Arc<PermissionMatrix>,
    /// Publisher side of the notification queue.
    pub events: EventQueue,
}

impl AppState {
    pub fn new(stores: Stores, config: ServerConfig, events: EventQueue) -> Self {
        Self {
            stores,
            config: Arc::new(config),
            permissions: Arc::new(PermissionMatrix::default()),
            events,
        }
    }

    pub fn transition_policy(&self) -> TransitionPolicy {
        self.config.transition_policy
    }
}
