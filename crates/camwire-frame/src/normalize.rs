//! Source pixel layout normalization.
//!
//! The simulator camera hands over `(width, height, pixel_format, data)`; this
//! module turns that into a [`CanonicalFrame`] without touching the source
//! buffer.

use bytes::{Bytes, BytesMut};
use tracing::debug;

use crate::error::{FrameError, Result};
use crate::geometry::{CanonicalFrame, ElementType, ImageGeometry};

/// Simulator code for 8-bit luminance.
pub const L_INT8: i32 = 1;
/// Simulator code for 8-bit BGR.
pub const BGR_INT8: i32 = 3;
/// Simulator code for 8-bit RGB.
pub const RGB_INT8: i32 = 4;

/// Producer-side pixel layout, before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourcePixelFormat {
    Grayscale8,
    Bgr8,
    Rgb8,
    Unknown(i32),
}

impl SourcePixelFormat {
    pub fn from_code(code: i32) -> Self {
        match code {
            L_INT8 => SourcePixelFormat::Grayscale8,
            BGR_INT8 => SourcePixelFormat::Bgr8,
            RGB_INT8 => SourcePixelFormat::Rgb8,
            other => SourcePixelFormat::Unknown(other),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            SourcePixelFormat::Grayscale8 => L_INT8,
            SourcePixelFormat::Bgr8 => BGR_INT8,
            SourcePixelFormat::Rgb8 => RGB_INT8,
            SourcePixelFormat::Unknown(code) => code,
        }
    }

    /// Canonical element type this layout normalizes to.
    pub fn canonical_element_type(self) -> Result<ElementType> {
        match self {
            SourcePixelFormat::Grayscale8 => Ok(ElementType::Gray8),
            SourcePixelFormat::Bgr8 | SourcePixelFormat::Rgb8 => Ok(ElementType::Bgr8),
            SourcePixelFormat::Unknown(code) => Err(FrameError::UnsupportedFormat(code)),
        }
    }
}

/// One image as delivered by the simulator's image callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pub width: i32,
    pub height: i32,
    pub pixel_format: i32,
    pub data: Bytes,
}

impl SourceImage {
    pub fn new(width: i32, height: i32, pixel_format: i32, data: impl Into<Bytes>) -> Self {
        Self {
            width,
            height,
            pixel_format,
            data: data.into(),
        }
    }
}

/// Normalize a [`SourceImage`].
pub fn normalize_image(image: &SourceImage) -> Result<CanonicalFrame> {
    normalize(image.width, image.height, image.pixel_format, &image.data)
}

/// Convert a source buffer into a canonical frame.
///
/// `rows = height`, `cols = width`. The source must hold exactly
/// `width * height * bytes_per_pixel` bytes.
pub fn normalize(width: i32, height: i32, format_code: i32, buffer: &[u8]) -> Result<CanonicalFrame> {
    let format = SourcePixelFormat::from_code(format_code);
    let element_type = format.canonical_element_type()?;
    let geometry = ImageGeometry::new(height, width, element_type);
    geometry.check_len(buffer.len())?;

    let canonical = match format {
        SourcePixelFormat::Grayscale8 | SourcePixelFormat::Bgr8 => Bytes::copy_from_slice(buffer),
        SourcePixelFormat::Rgb8 => swap_red_blue(buffer),
        SourcePixelFormat::Unknown(code) => return Err(FrameError::UnsupportedFormat(code)),
    };

    debug!(width, height, format = format_code, %geometry, "normalized source image");
    CanonicalFrame::new(geometry, canonical)
}

/// Copy a packed 3-channel buffer, reversing channel order per pixel.
fn swap_red_blue(src: &[u8]) -> Bytes {
    let mut out = BytesMut::from(src);
    for pixel in out.chunks_exact_mut(3) {
        pixel.swap(0, 2);
    }
    out.freeze()
}
