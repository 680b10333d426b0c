//! Multipart publish/subscribe transport abstraction.
//!
//! A multipart message is an ordered list of independent byte parts that the
//! transport delivers atomically. This crate only moves parts around; it never
//! looks inside them.
//!
//! - [`memory`] — in-process channel pair, used by tests and embedding code
//! - [`zmq`] — ZeroMQ PUB/SUB sockets (behind the `zmq` feature)

pub mod error;
pub mod memory;
pub mod traits;

#[cfg(feature = "zmq")]
pub mod zmq;

pub use error::{Result, TransportError};
pub use memory::{channel, MemoryReceiver, MemorySender};
pub use traits::{MultipartReceiver, MultipartSender};

#[cfg(feature = "zmq")]
pub use self::zmq::{ZmqPublisher, ZmqSubscriber};
