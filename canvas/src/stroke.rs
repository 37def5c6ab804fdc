//! Freehand strokes: turns successive pointer samples into round-capped line
//! segments on the surface.
//!
//! The same rasterizer serves local strokes and remote `drawing` events, so
//! every client that sees the same segment produces the same pixels.

#[cfg(test)]
#[path = "stroke_test.rs"]
mod stroke_test;

use frames::DrawEvent;

use crate::input::{DrawingState, Point};
use crate::surface::{Pixel, RasterSurface};

/// Draw a segment from `from` to `to` with round caps.
///
/// A pixel `(px, py)` is painted when its integer address lies within
/// `width / 2` of the segment. The pixels containing both endpoints (as
/// addressed by [`Point::pixel`], the same rule fill seeds use) are always
/// painted, so zero-length and hairline segments are never invisible.
/// Everything is clipped to the surface.
#[allow(clippy::cast_possible_truncation)]
pub fn draw_segment(surface: &mut RasterSurface, from: Point, to: Point, color: Pixel, width: f64) {
    let radius = (width / 2.0).max(0.5);
    let r2 = radius * radius;

    let (Some(max_x), Some(max_y)) = (surface.width().checked_sub(1), surface.height().checked_sub(1)) else {
        return;
    };
    let clip = |v: f64, max: u32| -> Option<u32> {
        if v < 0.0 {
            return Some(0);
        }
        if v > f64::from(max) {
            return None;
        }
        Some(v as u32)
    };

    let lo_x = (from.x.min(to.x) - radius).floor();
    let hi_x = (from.x.max(to.x) + radius).ceil();
    let lo_y = (from.y.min(to.y) - radius).floor();
    let hi_y = (from.y.max(to.y) + radius).ceil();
    if hi_x < 0.0 || hi_y < 0.0 {
        return;
    }
    let (Some(x0), Some(y0)) = (clip(lo_x, max_x), clip(lo_y, max_y)) else {
        return;
    };
    let x1 = clip(hi_x, max_x).unwrap_or(max_x);
    let y1 = clip(hi_y, max_y).unwrap_or(max_y);

    for py in y0..=y1 {
        for px in x0..=x1 {
            let p = Point::new(f64::from(px), f64::from(py));
            if distance_sq_to_segment(p, from, to) <= r2 {
                surface.put_unchecked(px, py, color);
            }
        }
    }

    for end in [from, to] {
        let (ex, ey) = end.pixel();
        if let Some((px, py)) = surface.address(ex, ey) {
            surface.put_unchecked(px, py, color);
        }
    }
}

fn distance_sq_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 { 0.0 } else { (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0) };
    let (cx, cy) = (a.x + t * dx, a.y + t * dy);
    (p.x - cx) * (p.x - cx) + (p.y - cy) * (p.y - cy)
}

/// Tracks the in-progress local stroke.
#[derive(Debug, Clone, Default)]
pub struct StrokeRenderer {
    last: Option<Point>,
}

impl StrokeRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a stroke is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.last.is_some()
    }

    /// Start a fresh path at `point`. Nothing is drawn yet.
    pub fn begin_stroke(&mut self, point: Point) {
        self.last = Some(point);
    }

    /// Draw from the last recorded point to `point` and advance.
    ///
    /// Color comes from `state` after mode resolution, so eraser strokes are
    /// brush strokes in the background color. Returns the event describing
    /// the new endpoint for broadcast.
    pub fn extend_stroke(&mut self, surface: &mut RasterSurface, point: Point, state: &DrawingState) -> DrawEvent {
        let color = state.stroke_color();
        let from = self.last.unwrap_or(point);
        draw_segment(surface, from, point, Pixel::from(color), state.width);
        self.last = Some(point);
        DrawEvent { x: point.x, y: point.y, color, width: state.width }
    }

    /// Finish the stroke. Returns whether one was in progress, i.e. whether
    /// the caller should commit history.
    pub fn end_stroke(&mut self) -> bool {
        self.last.take().is_some()
    }
}
