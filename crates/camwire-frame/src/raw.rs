use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::debug;

use crate::codec::{expect_parts, FrameCodec};
use crate::error::{FrameError, Result};
use crate::geometry::{CanonicalFrame, ElementType, ImageGeometry};

/// Header part: rows (4) + cols (4) + type code (4) = 12 bytes.
pub const RAW_HEADER_SIZE: usize = 12;

const PARTS: usize = 2;

/// Fixed-header raw multipart codec.
///
/// Wire format, two transport parts:
/// ```text
/// part 1 ┌────────────┬────────────┬────────────┐
///        │ rows (i32) │ cols (i32) │ type (i32) │   little-endian
///        └────────────┴────────────┴────────────┘
/// part 2 ┌──────────────────────────────────────┐
///        │ rows * cols * element_size raw bytes │
///        └──────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RawCodec;

impl RawCodec {
    pub fn new() -> Self {
        Self
    }
}

/// Encode the 12-byte geometry header.
pub fn encode_header(geometry: ImageGeometry, dst: &mut BytesMut) {
    dst.reserve(RAW_HEADER_SIZE);
    dst.put_i32_le(geometry.rows);
    dst.put_i32_le(geometry.cols);
    dst.put_i32_le(geometry.element_type.wire_code());
}

/// Decode the 12-byte geometry header.
pub fn decode_header(mut src: &[u8]) -> Result<ImageGeometry> {
    if src.len() != RAW_HEADER_SIZE {
        return Err(FrameError::InvalidHeader { len: src.len() });
    }
    let rows = src.get_i32_le();
    let cols = src.get_i32_le();
    let element_type = ElementType::from_wire_code(src.get_i32_le())?;

    let geometry = ImageGeometry::new(rows, cols, element_type);
    geometry.byte_len()?;
    Ok(geometry)
}

impl FrameCodec for RawCodec {
    fn encode(&self, frame: &CanonicalFrame) -> Result<Vec<Bytes>> {
        let mut header = BytesMut::with_capacity(RAW_HEADER_SIZE);
        encode_header(frame.geometry(), &mut header);
        Ok(vec![header.freeze(), frame.buffer().clone()])
    }

    fn decode(&self, parts: Vec<Bytes>) -> Result<CanonicalFrame> {
        let [header, payload] = expect_parts::<PARTS>(parts)?;

        let geometry = decode_header(&header)?;
        let frame = CanonicalFrame::new(geometry, payload)?;
        debug!(%geometry, "decoded raw multipart frame");
        Ok(frame)
    }
}
