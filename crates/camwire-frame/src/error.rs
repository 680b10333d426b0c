/// Per-frame errors raised while normalizing, encoding or decoding.
///
/// Every variant is confined to a single frame: callers drop the frame and
/// carry on with the next one.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The source pixel layout code is not one the normalizer understands.
    #[error("unsupported source pixel format {0} (known: 1=L_INT8, 3=BGR_INT8, 4=RGB_INT8)")]
    UnsupportedFormat(i32),

    /// A buffer length disagrees with the geometry it is supposed to fill.
    #[error("frame size mismatch (expected {expected} bytes, got {actual})")]
    FrameSizeMismatch { expected: usize, actual: usize },

    /// A tagged record is missing one of its required keys.
    #[error("tagged record is missing field `{0}`")]
    MissingField(&'static str),

    /// A tagged field holds a value of the wrong kind.
    #[error("field `{field}` has the wrong type (expected {expected})")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
    },

    /// A multipart message has fewer parts than the encoding requires.
    #[error("missing message part (expected {expected}, got {actual})")]
    MissingPart { expected: usize, actual: usize },

    /// A multipart message has more parts than the encoding allows.
    #[error("unexpected message parts (expected {expected}, got {actual})")]
    UnexpectedParts { expected: usize, actual: usize },

    /// The raw header part is not exactly 12 bytes.
    #[error("invalid raw header ({len} bytes, expected 12)")]
    InvalidHeader { len: usize },

    /// The wire element-type code maps to no known element type.
    #[error("unknown element type code {0}")]
    UnknownElementType(i32),

    /// Rows or columns are negative, or their product overflows.
    #[error("invalid geometry {rows}x{cols}")]
    InvalidGeometry { rows: i64, cols: i64 },

    /// The MessagePack payload could not be parsed at all.
    #[error("malformed msgpack payload: {0}")]
    Malformed(#[from] rmpv::decode::Error),

    /// A MessagePack value was followed by unparsed bytes.
    #[error("{len} trailing bytes after msgpack value")]
    TrailingBytes { len: usize },

    /// MessagePack serialization failed.
    #[error("msgpack encode failed: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
}

pub type Result<T> = std::result::Result<T, FrameError>;
