//! Synthetic image source.
//!
//! Stands in for the simulator camera when no simulator is running: produces
//! a moving gradient in any of the source pixel layouts the normalizer accepts.

use bytes::Bytes;
use camwire_frame::{SourceImage, BGR_INT8, L_INT8, RGB_INT8};

/// Source pixel layouts the pattern can be emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternFormat {
    Gray8,
    Bgr8,
    Rgb8,
}

impl PatternFormat {
    /// Simulator pixel format code for this layout.
    pub fn code(self) -> i32 {
        match self {
            PatternFormat::Gray8 => L_INT8,
            PatternFormat::Bgr8 => BGR_INT8,
            PatternFormat::Rgb8 => RGB_INT8,
        }
    }

    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PatternFormat::Gray8 => 1,
            PatternFormat::Bgr8 | PatternFormat::Rgb8 => 3,
        }
    }
}

/// Moving gradient generator.
///
/// Pixel `(r, c)` of frame `n` is, in BGR order,
/// `((r + n) % 255, (c + 2n) % 255, (r + c + 3n) % 255)`; grayscale uses the
/// last component.
#[derive(Debug, Clone)]
pub struct TestPattern {
    width: i32,
    height: i32,
    format: PatternFormat,
    frame_id: u64,
}

impl TestPattern {
    pub fn new(width: i32, height: i32, format: PatternFormat) -> Self {
        Self {
            width,
            height,
            format,
            frame_id: 0,
        }
    }

    /// Index of the next frame to be generated.
    pub fn frame_id(&self) -> u64 {
        self.frame_id
    }

    /// Render the next frame and advance the animation.
    pub fn next_image(&mut self) -> SourceImage {
        let image = self.render(self.frame_id);
        self.frame_id = self.frame_id.wrapping_add(1);
        image
    }

    /// Render frame `n` without advancing.
    pub fn render(&self, n: u64) -> SourceImage {
        let rows = usize::try_from(self.height).unwrap_or(0);
        let cols = usize::try_from(self.width).unwrap_or(0);
        let n = (n % 255) as usize;
        let mut data = Vec::with_capacity(rows * cols * self.format.bytes_per_pixel());

        for r in 0..rows {
            for c in 0..cols {
                let b = ((r + n) % 255) as u8;
                let g = ((c + 2 * n) % 255) as u8;
                let red = ((r + c + 3 * n) % 255) as u8;
                match self.format {
                    PatternFormat::Gray8 => data.push(red),
                    PatternFormat::Bgr8 => data.extend_from_slice(&[b, g, red]),
                    PatternFormat::Rgb8 => data.extend_from_slice(&[red, g, b]),
                }
            }
        }

        SourceImage {
            width: self.width,
            height: self.height,
            pixel_format: self.format.code(),
            data: Bytes::from(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use camwire_frame::normalize_image;

    use super::*;

    #[test]
    fn buffer_size_matches_dimensions() {
        for format in [PatternFormat::Gray8, PatternFormat::Bgr8, PatternFormat::Rgb8] {
            let image = TestPattern::new(8, 4, format).next_image();
            assert_eq!(image.data.len(), 8 * 4 * format.bytes_per_pixel());
            assert_eq!(image.pixel_format, format.code());
        }
    }

    #[test]
    fn rgb_and_bgr_normalize_to_same_frame() {
        let bgr = normalize_image(&TestPattern::new(5, 3, PatternFormat::Bgr8).render(7)).unwrap();
        let rgb = normalize_image(&TestPattern::new(5, 3, PatternFormat::Rgb8).render(7)).unwrap();
        assert_eq!(bgr, rgb);
    }

    #[test]
    fn pattern_advances_per_frame() {
        let mut pattern = TestPattern::new(2, 2, PatternFormat::Bgr8);
        let first = pattern.next_image();
        let second = pattern.next_image();

        assert_eq!(pattern.frame_id(), 2);
        assert_ne!(first.data, second.data);
        assert_eq!(&first.data[..3], &[0, 0, 0]);
        assert_eq!(&second.data[..3], &[1, 2, 3]);
    }
}
