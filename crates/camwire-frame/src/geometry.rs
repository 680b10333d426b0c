use bytes::Bytes;

use crate::error::{FrameError, Result};

/// Per-pixel storage layout of a canonical frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// Single 8-bit channel.
    Gray8,
    /// Three 8-bit channels in blue, green, red order.
    Bgr8,
}

impl ElementType {
    /// Bytes used by one pixel.
    pub const fn element_size(self) -> usize {
        match self {
            ElementType::Gray8 => 1,
            ElementType::Bgr8 => 3,
        }
    }

    /// Number of interleaved channels.
    pub const fn channels(self) -> usize {
        self.element_size()
    }

    /// Numeric tag carried on the wire.
    ///
    /// Values match the dense-matrix type codes existing consumers expect
    /// (`0` for one 8-bit channel, `16` for three).
    pub const fn wire_code(self) -> i32 {
        match self {
            ElementType::Gray8 => 0,
            ElementType::Bgr8 => 16,
        }
    }

    /// Inverse of [`ElementType::wire_code`].
    pub fn from_wire_code(code: i32) -> Result<Self> {
        match code {
            0 => Ok(ElementType::Gray8),
            16 => Ok(ElementType::Bgr8),
            other => Err(FrameError::UnknownElementType(other)),
        }
    }

    /// Element type with the given channel count, if one exists.
    pub fn from_channels(channels: usize) -> Option<Self> {
        match channels {
            1 => Some(ElementType::Gray8),
            3 => Some(ElementType::Bgr8),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ElementType::Gray8 => "GRAY8",
            ElementType::Bgr8 => "BGR8",
        }
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of an image buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageGeometry {
    pub rows: i32,
    pub cols: i32,
    pub element_type: ElementType,
}

impl ImageGeometry {
    pub const fn new(rows: i32, cols: i32, element_type: ElementType) -> Self {
        Self {
            rows,
            cols,
            element_type,
        }
    }

    /// Required buffer length: `rows * cols * element_size`.
    ///
    /// Fails with [`FrameError::InvalidGeometry`] for negative dimensions or
    /// when the product does not fit in `usize`.
    pub fn byte_len(&self) -> Result<usize> {
        let invalid = || FrameError::InvalidGeometry {
            rows: i64::from(self.rows),
            cols: i64::from(self.cols),
        };
        let rows = usize::try_from(self.rows).map_err(|_| invalid())?;
        let cols = usize::try_from(self.cols).map_err(|_| invalid())?;
        rows.checked_mul(cols)
            .and_then(|pixels| pixels.checked_mul(self.element_type.element_size()))
            .ok_or_else(invalid)
    }

    /// Check that `actual` bytes exactly fill this geometry.
    pub fn check_len(&self, actual: usize) -> Result<()> {
        let expected = self.byte_len()?;
        if expected != actual {
            return Err(FrameError::FrameSizeMismatch { expected, actual });
        }
        Ok(())
    }
}

impl std::fmt::Display for ImageGeometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{} {}", self.rows, self.cols, self.element_type)
    }
}

/// One image in canonical layout: row-major, BGR or single channel.
///
/// The buffer length always equals `geometry.byte_len()`; the only way to
/// build a frame is through the checked constructors below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalFrame {
    geometry: ImageGeometry,
    buffer: Bytes,
    topic: Option<String>,
}

impl CanonicalFrame {
    /// Create a frame, validating the buffer against the geometry.
    pub fn new(geometry: ImageGeometry, buffer: impl Into<Bytes>) -> Result<Self> {
        let buffer = buffer.into();
        geometry.check_len(buffer.len())?;
        Ok(Self {
            geometry,
            buffer,
            topic: None,
        })
    }

    /// Attach the topic the frame was published or received under.
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn geometry(&self) -> ImageGeometry {
        self.geometry
    }

    pub fn rows(&self) -> i32 {
        self.geometry.rows
    }

    pub fn cols(&self) -> i32 {
        self.geometry.cols
    }

    pub fn element_type(&self) -> ElementType {
        self.geometry.element_type
    }

    /// Raw pixel bytes.
    pub fn buffer(&self) -> &Bytes {
        &self.buffer
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    /// Split the frame into its parts.
    pub fn into_parts(self) -> (ImageGeometry, Bytes, Option<String>) {
        (self.geometry, self.buffer, self.topic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_sizes_and_codes() {
        assert_eq!(ElementType::Gray8.element_size(), 1);
        assert_eq!(ElementType::Bgr8.element_size(), 3);
        assert_eq!(ElementType::Gray8.wire_code(), 0);
        assert_eq!(ElementType::Bgr8.wire_code(), 16);
        assert_eq!(ElementType::from_wire_code(16).unwrap(), ElementType::Bgr8);
        assert!(matches!(
            ElementType::from_wire_code(24),
            Err(FrameError::UnknownElementType(24))
        ));
    }

    #[test]
    fn byte_len_multiplies_all_dimensions() {
        let geometry = ImageGeometry::new(480, 640, ElementType::Bgr8);
        assert_eq!(geometry.byte_len().unwrap(), 480 * 640 * 3);
        assert_eq!(
            ImageGeometry::new(0, 10, ElementType::Gray8).byte_len().unwrap(),
            0
        );
    }

    #[test]
    fn negative_dimensions_are_invalid() {
        let err = ImageGeometry::new(-1, 4, ElementType::Gray8)
            .byte_len()
            .unwrap_err();
        assert!(matches!(err, FrameError::InvalidGeometry { rows: -1, cols: 4 }));
    }

    #[test]
    fn frame_rejects_short_and_long_buffers() {
        let geometry = ImageGeometry::new(2, 2, ElementType::Gray8);
        assert!(CanonicalFrame::new(geometry, vec![0u8; 4]).is_ok());

        let short = CanonicalFrame::new(geometry, vec![0u8; 3]).unwrap_err();
        assert!(matches!(
            short,
            FrameError::FrameSizeMismatch {
                expected: 4,
                actual: 3
            }
        ));
        let long = CanonicalFrame::new(geometry, vec![0u8; 5]).unwrap_err();
        assert!(matches!(long, FrameError::FrameSizeMismatch { actual: 5, .. }));
    }

    #[test]
    fn topic_is_optional() {
        let geometry = ImageGeometry::new(1, 1, ElementType::Bgr8);
        let frame = CanonicalFrame::new(geometry, vec![1, 2, 3]).unwrap();
        assert_eq!(frame.topic(), None);

        let frame = frame.with_topic("camera/image");
        assert_eq!(frame.topic(), Some("camera/image"));
        assert_eq!(frame.geometry().to_string(), "1x1 BGR8");
    }
}
