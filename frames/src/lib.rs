//! Shared event model and JSON codec for the realtime drawing relay.
//!
//! This crate owns the wire representation used by the `canvas` engine, the
//! relay `server` and the `cli`. Exactly two event kinds travel on the wire:
//! `drawing` (one stroke segment endpoint) and `fill` (a seeded flood fill).
//!
//! Every WebSocket text message carries one [`Envelope`]. The relay only ever
//! looks at `event` and stamps `from`; `data` is opaque to it and is decoded
//! into a typed [`Event`] on the receiving client.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Event name for a stroke segment.
pub const DRAWING: &str = "drawing";

/// Event name for a flood fill.
pub const FILL: &str = "fill";

/// Error returned when decoding envelopes and events.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The text is not a JSON envelope.
    #[error("failed to decode envelope: {0}")]
    Decode(#[from] serde_json::Error),
    /// The envelope names an event kind other than `drawing` or `fill`.
    #[error("unknown event kind: {0}")]
    UnknownEvent(String),
    /// The payload is missing a field or a field has the wrong type.
    #[error("malformed {event} payload: {source}")]
    MalformedPayload {
        event: &'static str,
        #[source]
        source: serde_json::Error,
    },
    /// A numeric field is present but outside its valid range.
    #[error("invalid {event} field `{field}`")]
    InvalidField { event: &'static str, field: &'static str },
}

/// Error returned by [`Color::from_str`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color `{0}`: expected #RRGGBB")]
pub struct ColorError(pub String);

// =============================================================================
// COLOR
// =============================================================================

/// An opaque RGB color, written on the wire as `#rrggbb`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorError(s.to_owned());
        let hex = s.strip_prefix('#').ok_or_else(err)?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        Ok(Self { r: channel(0)?, g: channel(2)?, b: channel(4)? })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

// =============================================================================
// EVENTS
// =============================================================================

/// One stroke segment endpoint plus its style.
///
/// The segment start is implicit: it is the previous endpoint received from
/// the same sender.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrawEvent {
    pub x: f64,
    pub y: f64,
    pub color: Color,
    pub width: f64,
}

/// A seed point and the color to flood the seed's region with.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FillEvent {
    pub x: f64,
    pub y: f64,
    pub color: Color,
}

/// A decoded wire event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    Drawing(DrawEvent),
    Fill(FillEvent),
}

impl Event {
    /// The wire name of this event kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Drawing(_) => DRAWING,
            Self::Fill(_) => FILL,
        }
    }

    /// Wrap this event in an envelope with no origin.
    #[must_use]
    pub fn to_envelope(&self) -> Envelope {
        let data = match self {
            Self::Drawing(ev) => serde_json::to_value(ev),
            Self::Fill(ev) => serde_json::to_value(ev),
        };
        // Both payloads are plain structs of numbers and strings; conversion
        // to a JSON value cannot fail.
        Envelope::new(self.kind(), data.unwrap_or_default())
    }
}

impl TryFrom<&Envelope> for Event {
    type Error = CodecError;

    fn try_from(envelope: &Envelope) -> Result<Self, Self::Error> {
        match envelope.event.as_str() {
            DRAWING => {
                let ev: DrawEvent = decode_payload(DRAWING, &envelope.data)?;
                require_finite(DRAWING, "x", ev.x)?;
                require_finite(DRAWING, "y", ev.y)?;
                if !ev.width.is_finite() || ev.width <= 0.0 {
                    return Err(CodecError::InvalidField { event: DRAWING, field: "width" });
                }
                Ok(Self::Drawing(ev))
            }
            FILL => {
                let ev: FillEvent = decode_payload(FILL, &envelope.data)?;
                require_finite(FILL, "x", ev.x)?;
                require_finite(FILL, "y", ev.y)?;
                Ok(Self::Fill(ev))
            }
            other => Err(CodecError::UnknownEvent(other.to_owned())),
        }
    }
}

fn decode_payload<T: serde::de::DeserializeOwned>(event: &'static str, data: &Value) -> Result<T, CodecError> {
    T::deserialize(data).map_err(|source| CodecError::MalformedPayload { event, source })
}

fn require_finite(event: &'static str, field: &'static str, value: f64) -> Result<(), CodecError> {
    if value.is_finite() { Ok(()) } else { Err(CodecError::InvalidField { event, field }) }
}

// =============================================================================
// ENVELOPE
// =============================================================================

/// A single text message on the realtime wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Event name, `"drawing"` or `"fill"`.
    pub event: String,
    /// Origin connection id. Set by the relay, never by clients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Event payload, forwarded by the relay without inspection.
    #[serde(default = "empty_object")]
    pub data: Value,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl Envelope {
    #[must_use]
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self { event: event.into(), from: None, data }
    }

    /// Stamp the origin connection id.
    #[must_use]
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Whether the relay forwards this event kind.
    #[must_use]
    pub fn is_relayable(&self) -> bool {
        matches!(self.event.as_str(), DRAWING | FILL)
    }
}

/// Encode an envelope as a JSON text message.
#[must_use]
pub fn encode_envelope(envelope: &Envelope) -> String {
    // Serializing a struct of strings and a `Value` cannot fail.
    serde_json::to_string(envelope).unwrap_or_default()
}

/// Decode a JSON text message into an envelope.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] when the text is not a JSON object with a
/// string `event` field.
pub fn decode_envelope(text: &str) -> Result<Envelope, CodecError> {
    Ok(serde_json::from_str(text)?)
}

/// Encode a typed event, without origin, as a JSON text message.
#[must_use]
pub fn encode_event(event: &Event) -> String {
    encode_envelope(&event.to_envelope())
}

/// Decode a JSON text message into its origin and typed event.
///
/// # Errors
///
/// Returns any [`CodecError`] raised by envelope or payload decoding.
pub fn decode_event(text: &str) -> Result<(Option<String>, Event), CodecError> {
    let envelope = decode_envelope(text)?;
    let event = Event::try_from(&envelope)?;
    Ok((envelope.from, event))
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
