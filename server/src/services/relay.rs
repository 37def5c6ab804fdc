//! Relay service: connection registry and broadcast-to-others.
//!
//! The relay never inspects payloads. It checks that an inbound message is a
//! JSON envelope naming a relayed event, stamps the origin connection id into
//! `from`, and fans the result out to every other connection.

#[cfg(test)]
#[path = "relay_test.rs"]
mod relay_test;

use frames::CodecError;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("event {0:?} is not relayed")]
    NotRelayable(String),
}

/// Register a connection's outbound queue.
pub async fn join(state: &AppState, client_id: Uuid, tx: mpsc::Sender<String>) {
    let mut clients = state.clients.write().await;
    clients.insert(client_id, tx);
    debug!(%client_id, clients = clients.len(), "relay: joined");
}

/// Remove a connection. Unknown ids are ignored.
pub async fn part(state: &AppState, client_id: Uuid) {
    let mut clients = state.clients.write().await;
    if clients.remove(&client_id).is_some() {
        debug!(%client_id, clients = clients.len(), "relay: parted");
    }
}

/// Validate an inbound envelope and stamp its origin.
///
/// # Errors
///
/// Returns [`RelayError::Codec`] when `text` is not an envelope and
/// [`RelayError::NotRelayable`] for any event other than `drawing` / `fill`.
pub fn stamp(text: &str, from: Uuid) -> Result<String, RelayError> {
    let envelope = frames::decode_envelope(text)?;
    if !envelope.is_relayable() {
        return Err(RelayError::NotRelayable(envelope.event));
    }
    Ok(frames::encode_envelope(&envelope.with_from(from.to_string())))
}

/// Send `text` to every connection except `exclude`. Returns how many queues
/// accepted it.
pub async fn broadcast(state: &AppState, text: &str, exclude: Option<Uuid>) -> usize {
    let clients = state.clients.read().await;
    let mut delivered = 0;
    for (client_id, tx) in clients.iter() {
        if exclude == Some(*client_id) {
            continue;
        }
        // Best-effort: a full or closed queue drops this message for that peer.
        match tx.try_send(text.to_owned()) {
            Ok(()) => delivered += 1,
            Err(e) => debug!(%client_id, error = %e, "relay: peer queue rejected message"),
        }
    }
    delivered
}
