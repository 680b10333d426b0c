use bytes::Bytes;
use tracing::{debug, warn};

use crate::codec::{expect_parts, FrameCodec, DEFAULT_GEOMETRY, DEFAULT_TOPIC};
use crate::error::Result;
use crate::geometry::{CanonicalFrame, ImageGeometry};
use crate::packed::{pack_bytes, read_value, value_into_bytes};

const PARTS: usize = 2;

/// Topic-prefixed multipart codec.
///
/// Part 1 is the topic as raw UTF-8, part 2 a MessagePack `bin` holding the
/// pixel bytes. The payload does not describe its own shape: both sides agree
/// on a fixed geometry out of band, and the decoder rejects any payload whose
/// length does not match it.
#[derive(Debug, Clone)]
pub struct TopicPrefixedCodec {
    topic: String,
    expected: ImageGeometry,
}

impl TopicPrefixedCodec {
    /// `topic` is published for frames without their own topic and is the
    /// topic the decoder expects; `expected` is the agreed frame shape.
    pub fn new(topic: impl Into<String>, expected: ImageGeometry) -> Self {
        Self {
            topic: topic.into(),
            expected,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn expected_geometry(&self) -> ImageGeometry {
        self.expected
    }
}

impl Default for TopicPrefixedCodec {
    fn default() -> Self {
        Self::new(DEFAULT_TOPIC, DEFAULT_GEOMETRY)
    }
}

impl FrameCodec for TopicPrefixedCodec {
    fn encode(&self, frame: &CanonicalFrame) -> Result<Vec<Bytes>> {
        let topic = frame.topic().unwrap_or(&self.topic);
        let payload = pack_bytes(frame.buffer())?;
        Ok(vec![
            Bytes::copy_from_slice(topic.as_bytes()),
            Bytes::from(payload),
        ])
    }

    fn decode(&self, parts: Vec<Bytes>) -> Result<CanonicalFrame> {
        let [topic, payload] = expect_parts::<PARTS>(parts)?;

        let topic = String::from_utf8_lossy(&topic).into_owned();
        if topic != self.topic {
            warn!(received = %topic, expected = %self.topic, "unexpected topic");
        }

        let data = value_into_bytes(read_value(&payload)?, "payload")?;
        let frame = CanonicalFrame::new(self.expected, data)?.with_topic(topic);
        debug!(geometry = %self.expected, topic = frame.topic(), "decoded topic-prefixed frame");
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrameError;
    use crate::geometry::ElementType;

    fn small_codec() -> TopicPrefixedCodec {
        TopicPrefixedCodec::new("camera/image", ImageGeometry::new(2, 2, ElementType::Bgr8))
    }

    fn small_frame() -> CanonicalFrame {
        let data: Vec<u8> = (0..12).collect();
        CanonicalFrame::new(ImageGeometry::new(2, 2, ElementType::Bgr8), data).unwrap()
    }

    #[test]
    fn encode_emits_topic_then_packed_payload() {
        let parts = small_codec().encode(&small_frame()).unwrap();

        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].as_ref(), b"camera/image");
        assert_eq!(parts[1][0], 0xc4);
        assert_eq!(parts[1][1], 12);
        assert_eq!(&parts[1][2..], small_frame().buffer().as_ref());
    }

    #[test]
    fn roundtrip_restores_buffer_and_topic() {
        let codec = small_codec();
        let decoded = codec.decode(codec.encode(&small_frame()).unwrap()).unwrap();

        assert_eq!(decoded.geometry(), codec.expected_geometry());
        assert_eq!(decoded.buffer(), small_frame().buffer());
        assert_eq!(decoded.topic(), Some("camera/image"));
    }

    #[test]
    fn single_part_is_missing_part() {
        let err = small_codec()
            .decode(vec![Bytes::from_static(b"camera/image")])
            .unwrap_err();
        assert!(matches!(
            err,
            FrameError::MissingPart {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn wrong_payload_size_is_mismatch() {
        let parts = vec![
            Bytes::from_static(b"camera/image"),
            Bytes::from(pack_bytes(&[0u8; 11]).unwrap()),
        ];
        let err = small_codec().decode(parts).unwrap_err();
        assert!(matches!(
            err,
            FrameError::FrameSizeMismatch {
                expected: 12,
                actual: 11
            }
        ));
    }

    #[test]
    fn topic_mismatch_is_not_fatal() {
        let parts = vec![
            Bytes::from_static(b"other/topic"),
            Bytes::from(pack_bytes(&[0u8; 12]).unwrap()),
        ];
        let decoded = small_codec().decode(parts).unwrap();
        assert_eq!(decoded.topic(), Some("other/topic"));
    }

    #[test]
    fn invalid_utf8_topic_is_decoded_lossily() {
        let parts = vec![
            Bytes::from_static(b"cam\xffera"),
            Bytes::from(pack_bytes(&[0u8; 12]).unwrap()),
        ];
        let decoded = small_codec().decode(parts).unwrap();
        assert_eq!(decoded.topic(), Some("cam\u{fffd}era"));
        assert_eq!(decoded.buffer().len(), 12);
    }

    #[test]
    fn non_bytes_payload_is_type_mismatch() {
        let mut buf = Vec::new();
        rmpv::encode::write_value(&mut buf, &rmpv::Value::from("pixels")).unwrap();
        let parts = vec![Bytes::from_static(b"camera/image"), Bytes::from(buf)];
        let err = small_codec().decode(parts).unwrap_err();
        assert!(matches!(err, FrameError::TypeMismatch { field: "payload", .. }));
    }

    #[test]
    fn default_shape_is_vga_bgr() {
        let codec = TopicPrefixedCodec::default();
        assert_eq!(codec.expected_geometry().byte_len().unwrap(), 480 * 640 * 3);
        assert_eq!(codec.topic(), "camera/image");
    }
}
