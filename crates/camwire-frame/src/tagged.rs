use bytes::Bytes;
use rmpv::Value;
use serde::Serialize;
use tracing::debug;

use crate::codec::{expect_parts, FrameCodec, DEFAULT_TOPIC};
use crate::error::{FrameError, Result};
use crate::geometry::{CanonicalFrame, ElementType, ImageGeometry};
use crate::packed::{read_value, value_into_bytes, value_into_i32, value_into_string};

pub const FIELD_TOPIC: &str = "topic";
pub const FIELD_ROWS: &str = "rows";
pub const FIELD_COLS: &str = "cols";
pub const FIELD_TYPE: &str = "type";
pub const FIELD_DATA: &str = "data";

/// Single-part codec: one MessagePack map with five named fields.
///
/// ```text
/// { "topic": str, "rows": int, "cols": int, "type": int, "data": bin }
/// ```
///
/// Keys are looked up by name, so field order on the wire does not matter.
/// Extra keys are ignored.
#[derive(Debug, Clone)]
pub struct TaggedCodec {
    topic: String,
}

impl TaggedCodec {
    /// `topic` is written for frames that do not carry their own.
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

impl Default for TaggedCodec {
    fn default() -> Self {
        Self::new(DEFAULT_TOPIC)
    }
}

#[derive(Serialize)]
struct TaggedRecord<'a> {
    topic: &'a str,
    rows: i32,
    cols: i32,
    #[serde(rename = "type")]
    type_code: i32,
    #[serde(with = "serde_bytes")]
    data: &'a [u8],
}

impl FrameCodec for TaggedCodec {
    fn encode(&self, frame: &CanonicalFrame) -> Result<Vec<Bytes>> {
        let record = TaggedRecord {
            topic: frame.topic().unwrap_or(&self.topic),
            rows: frame.rows(),
            cols: frame.cols(),
            type_code: frame.element_type().wire_code(),
            data: frame.buffer().as_ref(),
        };
        let packed = rmp_serde::to_vec_named(&record)?;
        Ok(vec![Bytes::from(packed)])
    }

    fn decode(&self, parts: Vec<Bytes>) -> Result<CanonicalFrame> {
        let [record] = expect_parts::<1>(parts)?;

        let mut entries = match read_value(&record)? {
            Value::Map(entries) => entries,
            _ => {
                return Err(FrameError::TypeMismatch {
                    field: "<record>",
                    expected: "map",
                })
            }
        };

        let topic = value_into_string(take_field(&mut entries, FIELD_TOPIC)?, FIELD_TOPIC)?;
        let rows = value_into_i32(&take_field(&mut entries, FIELD_ROWS)?, FIELD_ROWS)?;
        let cols = value_into_i32(&take_field(&mut entries, FIELD_COLS)?, FIELD_COLS)?;
        let type_code = value_into_i32(&take_field(&mut entries, FIELD_TYPE)?, FIELD_TYPE)?;
        let data = value_into_bytes(take_field(&mut entries, FIELD_DATA)?, FIELD_DATA)?;

        let geometry = ImageGeometry::new(rows, cols, ElementType::from_wire_code(type_code)?);
        let frame = CanonicalFrame::new(geometry, data)?.with_topic(topic);
        debug!(%geometry, topic = frame.topic(), "decoded tagged frame");
        Ok(frame)
    }
}

/// Remove and return the value stored under `name`.
fn take_field(entries: &mut Vec<(Value, Value)>, name: &'static str) -> Result<Value> {
    let index = entries
        .iter()
        .position(|(key, _)| key.as_str() == Some(name))
        .ok_or(FrameError::MissingField(name))?;
    Ok(entries.swap_remove(index).1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_2x2() -> CanonicalFrame {
        let geometry = ImageGeometry::new(2, 2, ElementType::Gray8);
        CanonicalFrame::new(geometry, vec![1, 2, 3, 4])
            .unwrap()
            .with_topic("camera/image")
    }

    fn record(fields: Vec<(&str, Value)>) -> Vec<Bytes> {
        let map = Value::Map(
            fields
                .into_iter()
                .map(|(k, v)| (Value::from(k), v))
                .collect(),
        );
        let mut buf = Vec::new();
        rmpv::encode::write_value(&mut buf, &map).unwrap();
        vec![Bytes::from(buf)]
    }

    fn full_fields() -> Vec<(&'static str, Value)> {
        vec![
            ("topic", Value::from("camera/image")),
            ("rows", Value::from(2)),
            ("cols", Value::from(2)),
            ("type", Value::from(0)),
            ("data", Value::Binary(vec![1, 2, 3, 4])),
        ]
    }

    #[test]
    fn roundtrip_preserves_every_field() {
        let codec = TaggedCodec::default();
        let parts = codec.encode(&gray_2x2()).unwrap();
        assert_eq!(parts.len(), 1);

        let decoded = codec.decode(parts).unwrap();
        assert_eq!(decoded, gray_2x2());
    }

    #[test]
    fn encode_writes_five_named_keys() {
        let parts = TaggedCodec::default().encode(&gray_2x2()).unwrap();
        let Value::Map(entries) = read_value(&parts[0]).unwrap() else {
            panic!("record should be a map");
        };
        let keys: Vec<_> = entries.iter().filter_map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["topic", "rows", "cols", "type", "data"]);
        assert!(matches!(entries[4].1, Value::Binary(_)));
    }

    #[test]
    fn frame_without_topic_uses_codec_topic() {
        let geometry = ImageGeometry::new(1, 1, ElementType::Gray8);
        let frame = CanonicalFrame::new(geometry, vec![5]).unwrap();
        let codec = TaggedCodec::new("sim/cam0");

        let decoded = codec.decode(codec.encode(&frame).unwrap()).unwrap();
        assert_eq!(decoded.topic(), Some("sim/cam0"));
    }

    #[test]
    fn key_order_does_not_matter() {
        let mut fields = full_fields();
        fields.reverse();
        let decoded = TaggedCodec::default().decode(record(fields)).unwrap();
        assert_eq!(decoded, gray_2x2());
    }

    #[test]
    fn missing_data_field() {
        let mut fields = full_fields();
        fields.retain(|(k, _)| *k != "data");
        let err = TaggedCodec::default().decode(record(fields)).unwrap_err();
        assert!(matches!(err, FrameError::MissingField("data")));
    }

    #[test]
    fn wrong_field_kind_is_type_mismatch() {
        let mut fields = full_fields();
        fields[1] = ("rows", Value::from("two"));
        let err = TaggedCodec::default().decode(record(fields)).unwrap_err();
        assert!(matches!(err, FrameError::TypeMismatch { field: "rows", .. }));
    }

    #[test]
    fn invalid_utf8_topic_is_type_mismatch() {
        let mut fields = full_fields();
        fields[0] = ("topic", Value::from("##"));
        let mut packed = record(fields).remove(0).to_vec();
        let at = packed
            .windows(3)
            .position(|w| w == [0xa2, b'#', b'#'])
            .unwrap();
        packed[at + 1..at + 3].copy_from_slice(&[0xff, 0xfe]);

        let err = TaggedCodec::default()
            .decode(vec![Bytes::from(packed)])
            .unwrap_err();
        assert!(matches!(
            err,
            FrameError::TypeMismatch {
                field: "topic",
                expected: "utf-8 string"
            }
        ));
    }

    #[test]
    fn data_shorter_than_geometry_is_rejected() {
        let mut fields = full_fields();
        fields[4] = ("data", Value::Binary(vec![1, 2, 3]));
        let err = TaggedCodec::default().decode(record(fields)).unwrap_err();
        assert!(matches!(
            err,
            FrameError::FrameSizeMismatch {
                expected: 4,
                actual: 3
            }
        ));
    }

    #[test]
    fn data_as_integer_list_is_accepted() {
        let mut fields = full_fields();
        fields[4] = (
            "data",
            Value::Array(vec![1u8, 2, 3, 4].into_iter().map(Value::from).collect()),
        );
        let decoded = TaggedCodec::default().decode(record(fields)).unwrap();
        assert_eq!(decoded.buffer().as_ref(), &[1, 2, 3, 4]);
    }

    #[test]
    fn non_map_record_is_type_mismatch() {
        let mut buf = Vec::new();
        rmpv::encode::write_value(&mut buf, &Value::from(42)).unwrap();
        let err = TaggedCodec::default()
            .decode(vec![Bytes::from(buf)])
            .unwrap_err();
        assert!(matches!(err, FrameError::TypeMismatch { field: "<record>", .. }));
    }

    #[test]
    fn empty_record_is_malformed() {
        let err = TaggedCodec::default()
            .decode(vec![Bytes::new()])
            .unwrap_err();
        assert!(matches!(err, FrameError::Malformed(_)));
    }

    #[test]
    fn unknown_extra_keys_are_ignored() {
        let mut fields = full_fields();
        fields.push(("stamp", Value::from(1234)));
        assert!(TaggedCodec::default().decode(record(fields)).is_ok());
    }

    #[test]
    fn multipart_input_is_rejected() {
        let mut parts = TaggedCodec::default().encode(&gray_2x2()).unwrap();
        parts.push(Bytes::new());
        let err = TaggedCodec::default().decode(parts).unwrap_err();
        assert!(matches!(err, FrameError::UnexpectedParts { expected: 1, actual: 2 }));
    }
}
