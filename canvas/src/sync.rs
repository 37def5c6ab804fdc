//! Event synchronization between peers.
//!
//! Local actions are serialized into `drawing` / `fill` events and handed to a
//! [`NetworkChannel`]. Remote events are applied through the same rasterizer
//! and flood fill as local ones, so replicas that apply the same ordered
//! event sequence end up byte-identical.
//!
//! Remote strokes are tracked per peer: the segment start for a `drawing`
//! event is the previous point received from the same origin, never the
//! local in-progress stroke. Events without an origin share one slot. At most
//! [`MAX_TRACKED_PEERS`] origins are remembered; the least recently heard one
//! is forgotten first, and its next point starts a fresh dot.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use std::collections::HashMap;

use frames::{DrawEvent, Envelope, Event, FillEvent};
use tracing::{debug, trace, warn};

use crate::fill::{FillOutcome, flood_fill};
use crate::consts::MAX_TRACKED_PEERS;
use crate::history::HistoryStore;
use crate::input::Point;
use crate::stroke::draw_segment;
use crate::surface::{Pixel, RasterSurface};

/// Outbound half of the event transport.
pub trait NetworkChannel {
    /// Hand one envelope to the transport. Delivery is best-effort.
    fn send(&mut self, envelope: Envelope);
}

/// An in-memory outbox, used by headless hosts and tests.
impl NetworkChannel for Vec<Envelope> {
    fn send(&mut self, envelope: Envelope) {
        self.push(envelope);
    }
}

/// What applying one remote message did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// A segment was drawn.
    Drawn,
    /// A fill ran. `Unchanged` when the seed already had the color.
    Filled(FillOutcome),
    /// The message was malformed or addressed pixels off the surface.
    Dropped,
}

/// Per-session synchronization state.
#[derive(Debug, Clone, Default)]
pub struct SyncProtocol {
    /// Origin -> (last point, tick it was heard at).
    last_remote: HashMap<Option<String>, (Point, u64)>,
    tick: u64,
}

impl SyncProtocol {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Broadcast one local stroke endpoint.
    pub fn emit_draw(&self, channel: &mut dyn NetworkChannel, event: DrawEvent) {
        trace!(x = event.x, y = event.y, "sync: emit drawing");
        channel.send(Event::Drawing(event).to_envelope());
    }

    /// Broadcast one committed local fill.
    pub fn emit_fill(&self, channel: &mut dyn NetworkChannel, event: FillEvent) {
        debug!(x = event.x, y = event.y, color = %event.color, "sync: emit fill");
        channel.send(Event::Fill(event).to_envelope());
    }

    /// Draw a remote segment from the peer's previous point to the event's point.
    pub fn on_remote_draw(&mut self, surface: &mut RasterSurface, from: Option<&str>, event: &DrawEvent) {
        let to = Point::new(event.x, event.y);
        let start = self.track(from, to).unwrap_or(to);
        draw_segment(surface, start, to, Pixel::from(event.color), event.width);
    }

    /// Number of origins whose last point is remembered.
    #[must_use]
    pub fn tracked_peers(&self) -> usize {
        self.last_remote.len()
    }

    /// Record `to` as the origin's latest point and return the previous one.
    fn track(&mut self, from: Option<&str>, to: Point) -> Option<Point> {
        self.tick += 1;
        let key = from.map(str::to_owned);
        if !self.last_remote.contains_key(&key) && self.last_remote.len() >= MAX_TRACKED_PEERS {
            let stalest = self.last_remote.iter().min_by_key(|(_, (_, tick))| *tick).map(|(k, _)| k.clone());
            if let Some(stalest) = stalest {
                trace!(peer = ?stalest, "sync: forgetting stalest peer");
                self.last_remote.remove(&stalest);
            }
        }
        self.last_remote.insert(key, (to, self.tick)).map(|(point, _)| point)
    }

    /// Apply a remote fill. Commits history when pixels change; never re-emits.
    pub fn on_remote_fill(&mut self, surface: &mut RasterSurface, history: &mut HistoryStore, event: &FillEvent) -> Applied {
        let (px, py) = Point::new(event.x, event.y).pixel();
        let Some((x, y)) = surface.address(px, py) else {
            warn!(x = event.x, y = event.y, "sync: dropping fill outside surface");
            return Applied::Dropped;
        };
        match flood_fill(surface, x, y, Pixel::from(event.color)) {
            Ok(outcome) => {
                if outcome.changed() {
                    history.commit(surface);
                }
                Applied::Filled(outcome)
            }
            Err(e) => {
                warn!(error = %e, "sync: dropping fill");
                Applied::Dropped
            }
        }
    }

    /// Decode and apply one inbound text message. Malformed messages are
    /// logged and dropped.
    pub fn on_remote_text(&mut self, surface: &mut RasterSurface, history: &mut HistoryStore, text: &str) -> Applied {
        match frames::decode_event(text) {
            Ok((from, event)) => self.on_remote_event(surface, history, from.as_deref(), &event),
            Err(e) => {
                warn!(error = %e, "sync: dropping malformed event");
                Applied::Dropped
            }
        }
    }

    /// Apply one decoded remote event.
    pub fn on_remote_event(
        &mut self,
        surface: &mut RasterSurface,
        history: &mut HistoryStore,
        from: Option<&str>,
        event: &Event,
    ) -> Applied {
        match event {
            Event::Drawing(ev) => {
                self.on_remote_draw(surface, from, ev);
                Applied::Drawn
            }
            Event::Fill(ev) => self.on_remote_fill(surface, history, ev),
        }
    }
}
