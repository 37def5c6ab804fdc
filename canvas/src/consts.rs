//! Shared numeric constants for the canvas crate.

// ── Brush ───────────────────────────────────────────────────────

/// Initial brush width in pixels.
pub const DEFAULT_BRUSH_WIDTH: f64 = 5.0;

/// Narrowest brush the width control accepts.
pub const MIN_BRUSH_WIDTH: f64 = 1.0;

/// Widest brush the width control accepts.
pub const MAX_BRUSH_WIDTH: f64 = 100.0;

// ── Surface ─────────────────────────────────────────────────────

/// Surface width used before the host reports the real viewport.
pub const DEFAULT_WIDTH: u32 = 800;

/// Surface height used before the host reports the real viewport.
pub const DEFAULT_HEIGHT: u32 = 600;

// ── Sync ────────────────────────────────────────────────────────

/// Remote origins whose last stroke point is remembered at once.
pub const MAX_TRACKED_PEERS: usize = 256;
