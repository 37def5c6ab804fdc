//! Raster model: opaque RGBA pixels in a fixed-size grid, plus full-surface
//! snapshots for history.
//!
//! All writes are opaque overwrites. There is no blending and no
//! transparency: every pixel written through this module has `a == 255`.
//! The buffer layout is row-major RGBA8, the same layout a 2D canvas exposes
//! through `ImageData`, so it can be blitted without conversion.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use frames::Color;

/// Bytes per pixel in the RGBA8 buffer.
const CHANNELS: usize = 4;

/// A single RGBA8 pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    /// An opaque pixel.
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

impl From<Color> for Pixel {
    fn from(c: Color) -> Self {
        Self::opaque(c.r, c.g, c.b)
    }
}

/// Errors raised by pixel addressing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    /// A coordinate lies outside `[0, width) x [0, height)`.
    #[error("pixel ({x}, {y}) is outside the {width}x{height} surface")]
    OutOfBounds { x: i64, y: i64, width: u32, height: u32 },
}

/// An immutable full copy of a surface's pixels at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    width: u32,
    height: u32,
    data: Box<[u8]>,
}

impl Snapshot {
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }
}

/// The pixel buffer owned by one client session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterSurface {
    /// Allocate a `width x height` surface filled with `background`.
    #[must_use]
    pub fn new(width: u32, height: u32, background: Pixel) -> Self {
        let mut surface = Self { width, height, data: Vec::new() };
        surface.reallocate(width, height, background);
        surface
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes, row-major.
    #[must_use]
    pub fn as_rgba(&self) -> &[u8] {
        &self.data
    }

    /// Map a signed coordinate to an in-bounds pixel address.
    #[must_use]
    pub fn address(&self, x: i64, y: i64) -> Option<(u32, u32)> {
        let (Ok(px), Ok(py)) = (u32::try_from(x), u32::try_from(y)) else {
            return None;
        };
        (px < self.width && py < self.height).then_some((px, py))
    }

    /// Read one pixel.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::OutOfBounds`] when `(x, y)` is off the surface.
    pub fn get_pixel(&self, x: u32, y: u32) -> Result<Pixel, SurfaceError> {
        let i = self.offset(x, y)?;
        Ok(self.read_at(i))
    }

    /// Overwrite one pixel. Alpha is always written as 255.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::OutOfBounds`] when `(x, y)` is off the surface.
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: Pixel) -> Result<(), SurfaceError> {
        let i = self.offset(x, y)?;
        self.write_at(i, pixel);
        Ok(())
    }

    /// Paint every pixel with `pixel`.
    pub fn clear(&mut self, pixel: Pixel) {
        let rgba = [pixel.r, pixel.g, pixel.b, 255];
        for chunk in self.data.chunks_exact_mut(CHANNELS) {
            chunk.copy_from_slice(&rgba);
        }
    }

    /// Reallocate at new dimensions. All previous content is discarded.
    pub fn resize(&mut self, width: u32, height: u32, background: Pixel) {
        self.reallocate(width, height, background);
    }

    /// Full O(W·H) copy of the current pixels.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot { width: self.width, height: self.height, data: self.data.clone().into_boxed_slice() }
    }

    /// Overwrite the surface with `snapshot`.
    ///
    /// A snapshot taken at other dimensions is anchored at the origin: the
    /// overlapping rectangle is copied and the remainder is painted with
    /// `background`. Pixels are never resampled.
    pub fn restore(&mut self, snapshot: &Snapshot, background: Pixel) {
        if snapshot.width == self.width && snapshot.height == self.height {
            self.data.copy_from_slice(&snapshot.data);
            return;
        }

        self.clear(background);
        let cols = self.width.min(snapshot.width) as usize * CHANNELS;
        let rows = self.height.min(snapshot.height) as usize;
        let dst_stride = self.width as usize * CHANNELS;
        let src_stride = snapshot.width as usize * CHANNELS;
        for row in 0..rows {
            let dst = row * dst_stride;
            let src = row * src_stride;
            self.data[dst..dst + cols].copy_from_slice(&snapshot.data[src..src + cols]);
        }
    }

    // --- Crate-internal unchecked access for hot loops ---
    //
    // Callers guarantee `x < width && y < height`.

    pub(crate) fn pixel_unchecked(&self, x: u32, y: u32) -> Pixel {
        self.read_at(self.index(x, y))
    }

    pub(crate) fn put_unchecked(&mut self, x: u32, y: u32, pixel: Pixel) {
        let i = self.index(x, y);
        self.write_at(i, pixel);
    }

    fn reallocate(&mut self, width: u32, height: u32, background: Pixel) {
        self.width = width;
        self.height = height;
        self.data = vec![0; width as usize * height as usize * CHANNELS];
        self.clear(background);
    }

    fn offset(&self, x: u32, y: u32) -> Result<usize, SurfaceError> {
        if x >= self.width || y >= self.height {
            return Err(SurfaceError::OutOfBounds {
                x: i64::from(x),
                y: i64::from(y),
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.index(x, y))
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    fn read_at(&self, i: usize) -> Pixel {
        Pixel { r: self.data[i], g: self.data[i + 1], b: self.data[i + 2], a: self.data[i + 3] }
    }

    fn write_at(&mut self, i: usize, pixel: Pixel) {
        self.data[i..i + CHANNELS].copy_from_slice(&[pixel.r, pixel.g, pixel.b, 255]);
    }
}
