//! PNG export of the current surface.

use std::io::Cursor;

use image::{ImageFormat, RgbaImage};

use crate::surface::RasterSurface;

/// Errors raised while encoding an export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The surface has no pixels to encode.
    #[error("cannot export an empty {width}x{height} surface")]
    Empty { width: u32, height: u32 },
    /// The encoder rejected the image.
    #[error("png encode failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Encode the surface as a PNG file.
///
/// # Errors
///
/// Returns [`ExportError::Empty`] for a zero-area surface and
/// [`ExportError::Encode`] if the encoder fails.
pub fn encode_png(surface: &RasterSurface) -> Result<Vec<u8>, ExportError> {
    let (width, height) = (surface.width(), surface.height());
    let img = RgbaImage::from_raw(width, height, surface.as_rgba().to_vec())
        .filter(|_| width > 0 && height > 0)
        .ok_or(ExportError::Empty { width, height })?;

    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;
    Ok(buffer)
}
