//! Publisher and subscriber drivers for camera frames.
//!
//! [`FramePublisher`] turns each simulator image into a canonical frame and
//! sends it with one codec; [`FrameSubscriber`] runs the blocking receive loop
//! on the other side. Both own their transport half outright, so any
//! [`MultipartSender`](camwire_transport::MultipartSender) /
//! [`MultipartReceiver`](camwire_transport::MultipartReceiver) works,
//! including the in-memory pair used by the tests.

pub mod config;
pub mod error;
pub mod publisher;
pub mod source;
pub mod subscriber;

pub use config::{PublisherConfig, SubscriberConfig};
pub use error::{BridgeError, Result};
pub use publisher::{FramePublisher, PublishOutcome, PublisherStats};
pub use source::{PatternFormat, TestPattern};
pub use subscriber::{FrameSubscriber, ReceiveOutcome, SubscriberStats};
