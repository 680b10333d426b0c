//! Bridge simulated camera frames onto publish/subscribe transports.
//!
//! # Crate Structure
//!
//! - [`transport`] — Multipart send/receive abstraction (in-memory, ZeroMQ behind `zmq`)
//! - [`frame`] — Canonical frames, pixel normalization and the three wire codecs
//! - [`bridge`] — Publisher/subscriber drivers and the synthetic test pattern

/// Re-export transport types.
pub mod transport {
    pub use camwire_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use camwire_frame::*;
}

/// Re-export driver types.
pub mod bridge {
    pub use camwire_bridge::*;
}
