use std::str::FromStr;

use bytes::Bytes;

use crate::error::{FrameError, Result};
use crate::geometry::{CanonicalFrame, ElementType, ImageGeometry};
use crate::raw::RawCodec;
use crate::tagged::TaggedCodec;
use crate::topic::TopicPrefixedCodec;

/// Topic used when none is configured.
pub const DEFAULT_TOPIC: &str = "camera/image";

/// Frame shape assumed by the topic-prefixed codec unless configured: 640x480 BGR.
pub const DEFAULT_GEOMETRY: ImageGeometry = ImageGeometry::new(480, 640, ElementType::Bgr8);

/// Encoder/decoder pair for one wire format.
pub trait FrameCodec {
    /// Serialize a frame into the ordered transport parts.
    fn encode(&self, frame: &CanonicalFrame) -> Result<Vec<Bytes>>;

    /// Rebuild a frame from the transport parts of one message.
    fn decode(&self, parts: Vec<Bytes>) -> Result<CanonicalFrame>;
}

/// The three on-wire encodings. Producer and consumer must pick the same one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireFormat {
    /// 12-byte geometry header part + raw payload part.
    Raw,
    /// One MessagePack map `{topic, rows, cols, type, data}`.
    Tagged,
    /// Topic part + MessagePack byte blob part with a fixed shape.
    TopicPrefixed,
}

impl WireFormat {
    pub const ALL: [WireFormat; 3] = [WireFormat::Raw, WireFormat::Tagged, WireFormat::TopicPrefixed];

    pub fn as_str(self) -> &'static str {
        match self {
            WireFormat::Raw => "raw",
            WireFormat::Tagged => "tagged",
            WireFormat::TopicPrefixed => "topic",
        }
    }

    /// Number of transport parts one message carries.
    pub fn part_count(self) -> usize {
        match self {
            WireFormat::Tagged => 1,
            WireFormat::Raw | WireFormat::TopicPrefixed => 2,
        }
    }
}

impl std::fmt::Display for WireFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WireFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" | "multipart" => Ok(WireFormat::Raw),
            "tagged" | "msgpack" => Ok(WireFormat::Tagged),
            "topic" | "topic-prefixed" => Ok(WireFormat::TopicPrefixed),
            other => Err(format!(
                "unknown wire format `{other}` (expected raw, tagged or topic)"
            )),
        }
    }
}

/// Settings shared by the codecs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    /// Topic written by the tagged and topic-prefixed encoders, and expected
    /// by the topic-prefixed decoder.
    pub topic: String,
    /// Fixed frame shape for the topic-prefixed format.
    pub expected_geometry: ImageGeometry,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            topic: DEFAULT_TOPIC.to_string(),
            expected_geometry: DEFAULT_GEOMETRY,
        }
    }
}

/// A codec selected at runtime.
#[derive(Debug, Clone)]
pub enum Codec {
    Raw(RawCodec),
    Tagged(TaggedCodec),
    TopicPrefixed(TopicPrefixedCodec),
}

impl Codec {
    pub fn new(format: WireFormat, config: CodecConfig) -> Self {
        match format {
            WireFormat::Raw => Codec::Raw(RawCodec),
            WireFormat::Tagged => Codec::Tagged(TaggedCodec::new(config.topic)),
            WireFormat::TopicPrefixed => Codec::TopicPrefixed(TopicPrefixedCodec::new(
                config.topic,
                config.expected_geometry,
            )),
        }
    }

    pub fn format(&self) -> WireFormat {
        match self {
            Codec::Raw(_) => WireFormat::Raw,
            Codec::Tagged(_) => WireFormat::Tagged,
            Codec::TopicPrefixed(_) => WireFormat::TopicPrefixed,
        }
    }
}

impl FrameCodec for Codec {
    fn encode(&self, frame: &CanonicalFrame) -> Result<Vec<Bytes>> {
        match self {
            Codec::Raw(codec) => codec.encode(frame),
            Codec::Tagged(codec) => codec.encode(frame),
            Codec::TopicPrefixed(codec) => codec.encode(frame),
        }
    }

    fn decode(&self, parts: Vec<Bytes>) -> Result<CanonicalFrame> {
        match self {
            Codec::Raw(codec) => codec.decode(parts),
            Codec::Tagged(codec) => codec.decode(parts),
            Codec::TopicPrefixed(codec) => codec.decode(parts),
        }
    }
}

/// Check the part count of a message and destructure it.
pub(crate) fn expect_parts<const N: usize>(parts: Vec<Bytes>) -> Result<[Bytes; N]> {
    parts.try_into().map_err(|parts: Vec<Bytes>| {
        if parts.len() < N {
            FrameError::MissingPart {
                expected: N,
                actual: parts.len(),
            }
        } else {
            FrameError::UnexpectedParts {
                expected: N,
                actual: parts.len(),
            }
        }
    })
}
