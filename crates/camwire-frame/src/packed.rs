//! MessagePack helpers shared by the tagged and topic-prefixed codecs.

use bytes::Bytes;
use rmpv::Value;

use crate::error::{FrameError, Result};

/// Pack a byte sequence as a single MessagePack `bin` value.
pub(crate) fn pack_bytes(data: &[u8]) -> Result<Vec<u8>> {
    Ok(rmp_serde::to_vec(serde_bytes::Bytes::new(data))?)
}

/// Parse exactly one MessagePack value spanning the whole input.
pub(crate) fn read_value(src: &[u8]) -> Result<Value> {
    let mut cursor = src;
    let value = rmpv::decode::read_value(&mut cursor)?;
    if !cursor.is_empty() {
        return Err(FrameError::TrailingBytes { len: cursor.len() });
    }
    Ok(value)
}

/// Interpret a value as a byte sequence.
///
/// Accepts `bin`, and arrays of integers in `0..=255` as written by producers
/// that pack a plain list of bytes.
pub(crate) fn value_into_bytes(value: Value, field: &'static str) -> Result<Bytes> {
    let mismatch = || FrameError::TypeMismatch {
        field,
        expected: "bytes",
    };
    match value {
        Value::Binary(data) => Ok(Bytes::from(data)),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_u64()
                    .and_then(|byte| u8::try_from(byte).ok())
                    .ok_or_else(mismatch)
            })
            .collect::<Result<Vec<u8>>>()
            .map(Bytes::from),
        _ => Err(mismatch()),
    }
}

pub(crate) fn value_into_i32(value: &Value, field: &'static str) -> Result<i32> {
    value
        .as_i64()
        .and_then(|n| i32::try_from(n).ok())
        .ok_or(FrameError::TypeMismatch {
            field,
            expected: "32-bit integer",
        })
}

pub(crate) fn value_into_string(value: Value, field: &'static str) -> Result<String> {
    match value {
        Value::String(text) => text.into_str().ok_or(FrameError::TypeMismatch {
            field,
            expected: "utf-8 string",
        }),
        _ => Err(FrameError::TypeMismatch {
            field,
            expected: "string",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_bytes_use_bin_encoding() {
        let packed = pack_bytes(&[1, 2, 3]).unwrap();
        // bin8 marker, length, payload
        assert_eq!(packed, vec![0xc4, 3, 1, 2, 3]);
        let value = read_value(&packed).unwrap();
        assert_eq!(value_into_bytes(value, "payload").unwrap().as_ref(), &[1, 2, 3]);
    }

    #[test]
    fn byte_arrays_are_accepted() {
        let value = Value::Array(vec![Value::from(0u8), Value::from(255u8)]);
        assert_eq!(value_into_bytes(value, "data").unwrap().as_ref(), &[0, 255]);
    }

    #[test]
    fn out_of_range_array_items_are_type_mismatch() {
        let value = Value::Array(vec![Value::from(256u16)]);
        let err = value_into_bytes(value, "data").unwrap_err();
        assert!(matches!(err, FrameError::TypeMismatch { field: "data", .. }));
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut packed = pack_bytes(&[9]).unwrap();
        packed.push(0xc0);
        let err = read_value(&packed).unwrap_err();
        assert!(matches!(err, FrameError::TrailingBytes { len: 1 }));
    }

    #[test]
    fn truncated_input_is_malformed() {
        let err = read_value(&[0xc4, 10, 1]).unwrap_err();
        assert!(matches!(err, FrameError::Malformed(_)));
    }

    #[test]
    fn integers_must_fit_i32() {
        assert_eq!(value_into_i32(&Value::from(-7), "rows").unwrap(), -7);
        let err = value_into_i32(&Value::from(u64::MAX), "rows").unwrap_err();
        assert!(matches!(err, FrameError::TypeMismatch { field: "rows", .. }));
        assert!(value_into_i32(&Value::from("12"), "rows").is_err());
    }
}
