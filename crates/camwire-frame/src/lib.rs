//! Canonical image frames and their wire encodings.
//!
//! A source image is normalized once into a [`CanonicalFrame`] (row-major,
//! BGR or single channel) and then serialized by exactly one codec:
//! - [`raw`] — 12-byte `(rows, cols, type)` header part + raw payload part
//! - [`tagged`] — one MessagePack map `{topic, rows, cols, type, data}`
//! - [`topic`] — topic part + MessagePack byte blob part, fixed out-of-band shape
//!
//! Producer and consumer must agree on the codec a priori; nothing on the wire
//! identifies which one is in use.

pub mod codec;
pub mod error;
pub mod geometry;
pub mod normalize;
pub mod raw;
pub mod tagged;
pub mod topic;

mod packed;

pub use codec::{Codec, CodecConfig, FrameCodec, WireFormat, DEFAULT_GEOMETRY, DEFAULT_TOPIC};
pub use error::{FrameError, Result};
pub use geometry::{CanonicalFrame, ElementType, ImageGeometry};
pub use normalize::{
    normalize, normalize_image, SourceImage, SourcePixelFormat, BGR_INT8, L_INT8, RGB_INT8,
};
pub use raw::{decode_header, encode_header, RawCodec, RAW_HEADER_SIZE};
pub use tagged::TaggedCodec;
pub use topic::TopicPrefixedCodec;
