//! WebSocket handler: stateless event relay.
//!
//! DESIGN
//! ======
//! On upgrade, generates a client ID, registers an outbound queue, and enters
//! a `select!` loop:
//! - Incoming client text → stamp origin → broadcast to every other client
//! - Queued text from peers → forward to this client
//!
//! The relay keeps no history. A client that connects late sees only events
//! broadcast after it joined.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → register queue, log `client connected`
//! 2. Client sends envelopes → relay to peers (never echoed to sender)
//! 3. Close → unregister, log `client disconnected`

#[cfg(test)]
#[path = "ws_test.rs"]
mod ws_test;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tokio::sync::mpsc;
use tracing::{info, trace, warn};
use uuid::Uuid;

use crate::services::relay;
use crate::state::AppState;

// =============================================================================
// OUTCOME
// =============================================================================

/// What happened to one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// Forwarded; the count is how many peers accepted it.
    Relayed(usize),
    /// Not an envelope or not a relayed event. Logged and discarded.
    Dropped,
}

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let client_id = Uuid::new_v4();

    // Per-connection queue for text broadcast by peers.
    let (client_tx, mut client_rx) = mpsc::channel::<String>(state.config.channel_capacity);
    relay::join(&state, client_id, client_tx).await;

    info!(%client_id, "ws: client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        if let Outcome::Relayed(peers) = process_inbound_text(&state, client_id, text.as_str()).await {
                            trace!(%client_id, peers, "ws: relayed");
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(text) = client_rx.recv() => {
                if let Err(e) = socket.send(Message::Text(text.into())).await {
                    warn!(%client_id, error = %e, "ws: send failed");
                    break;
                }
            }
        }
    }

    relay::part(&state, client_id).await;
    info!(%client_id, "ws: client disconnected");
}

// =============================================================================
// RELAY
// =============================================================================

/// Validate, stamp and broadcast one inbound text message.
///
/// Kept separate from the socket loop so tests can drive relaying with plain
/// channels.
async fn process_inbound_text(state: &AppState, client_id: Uuid, text: &str) -> Outcome {
    match relay::stamp(text, client_id) {
        Ok(stamped) => Outcome::Relayed(relay::broadcast(state, &stamped, Some(client_id)).await),
        Err(e) => {
            warn!(%client_id, error = %e, "ws: dropping inbound message");
            Outcome::Dropped
        }
    }
}
