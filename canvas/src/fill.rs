//! Seeded flood fill over a [`RasterSurface`].
//!
//! 4-connected, exact-match, iterative with an explicit stack. Neighbors are
//! pushed without a visited set; a popped pixel is only written if it still
//! holds the target color, so re-pushed pixels are discarded on pop.
//! Termination follows from `fill != target`: each write permanently removes
//! one pixel from the candidate region.

#[cfg(test)]
#[path = "fill_test.rs"]
mod fill_test;

use crate::surface::{Pixel, RasterSurface, SurfaceError};

/// What a fill did to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillOutcome {
    /// The seed already had the fill color. Nothing was written.
    Unchanged,
    /// `pixels` pixels were recolored.
    Filled { pixels: usize },
}

impl FillOutcome {
    #[must_use]
    pub fn changed(self) -> bool {
        matches!(self, Self::Filled { .. })
    }
}

/// Flood the region containing `(seed_x, seed_y)` with `fill`.
///
/// # Errors
///
/// Returns [`SurfaceError::OutOfBounds`] if the seed is off the surface.
/// Neighbors are bounds-checked before being pushed, so no other error can
/// occur.
pub fn flood_fill(surface: &mut RasterSurface, seed_x: u32, seed_y: u32, fill: Pixel) -> Result<FillOutcome, SurfaceError> {
    let target = surface.get_pixel(seed_x, seed_y)?;
    let fill = Pixel::opaque(fill.r, fill.g, fill.b);
    if target == fill {
        return Ok(FillOutcome::Unchanged);
    }

    let (width, height) = (surface.width(), surface.height());
    let mut stack = vec![(seed_x, seed_y)];
    let mut pixels = 0;

    while let Some((x, y)) = stack.pop() {
        if surface.pixel_unchecked(x, y) != target {
            continue;
        }
        surface.put_unchecked(x, y, fill);
        pixels += 1;

        if x > 0 {
            stack.push((x - 1, y));
        }
        if x + 1 < width {
            stack.push((x + 1, y));
        }
        if y > 0 {
            stack.push((x, y - 1));
        }
        if y + 1 < height {
            stack.push((x, y + 1));
        }
    }

    Ok(FillOutcome::Filled { pixels })
}
