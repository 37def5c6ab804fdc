//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. The
//! relay keeps no canvas state: the only thing it tracks is the set of live
//! connections and the sender half of each one's outbound queue.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use crate::config::RelayConfig;

/// Connected clients: `client_id` -> sender for outgoing relay text.
pub type Clients = HashMap<Uuid, mpsc::Sender<String>>;

/// Shared application state. Clone is required by Axum; inner fields are
/// Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub clients: Arc<RwLock<Clients>>,
    pub config: Arc<RelayConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(config: RelayConfig) -> Self {
        Self { clients: Arc::new(RwLock::new(HashMap::new())), config: Arc::new(config) }
    }

    /// Number of live connections.
    pub async fn client_count(&self) -> usize {
        self.clients.read().await.len()
    }
}
