use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};

use camwire_frame::{CanonicalFrame, Codec, FrameCodec, FrameError};
use camwire_transport::{MultipartReceiver, TransportError};
use tracing::{debug, info, warn};

use crate::config::SubscriberConfig;
use crate::error::{BridgeError, Result};

/// What came out of one received message.
#[derive(Debug)]
pub enum ReceiveOutcome {
    /// A fully validated frame.
    Frame(CanonicalFrame),
    /// The message was received but could not be decoded.
    Dropped(FrameError),
}

/// Running counters for a subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubscriberStats {
    pub received: u64,
    pub dropped: u64,
}

/// Consumer-side driver: a blocking receive-and-decode loop.
pub struct FrameSubscriber<R> {
    receiver: R,
    codec: Codec,
    stats: SubscriberStats,
}

impl<R: MultipartReceiver> FrameSubscriber<R> {
    pub fn new(receiver: R, config: SubscriberConfig) -> Self {
        let codec = Codec::new(config.format, config.codec_config());
        Self {
            receiver,
            codec,
            stats: SubscriberStats::default(),
        }
    }

    /// Block for the next message and decode it.
    ///
    /// Decode failures come back as [`ReceiveOutcome::Dropped`]; only transport
    /// errors are returned as `Err`.
    pub fn recv_frame(&mut self) -> Result<ReceiveOutcome> {
        let parts = self.receiver.recv_parts()?;
        match self.codec.decode(parts) {
            Ok(frame) => {
                self.stats.received += 1;
                debug!(geometry = %frame.geometry(), topic = frame.topic(), "received frame");
                Ok(ReceiveOutcome::Frame(frame))
            }
            Err(err) => {
                self.stats.dropped += 1;
                warn!(error = %err, format = %self.codec.format(), "dropping frame");
                Ok(ReceiveOutcome::Dropped(err))
            }
        }
    }

    /// Receive frames until `stop` is set, the handler breaks, or the
    /// transport closes.
    ///
    /// `stop` is checked once per iteration, never during a blocking receive.
    /// Malformed frames are skipped. A closed transport ends the loop
    /// normally; any other transport error is returned.
    pub fn run<F>(&mut self, stop: &AtomicBool, mut handler: F) -> Result<SubscriberStats>
    where
        F: FnMut(&CanonicalFrame) -> ControlFlow<()>,
    {
        while !stop.load(Ordering::SeqCst) {
            match self.recv_frame() {
                Ok(ReceiveOutcome::Frame(frame)) => {
                    if handler(&frame).is_break() {
                        break;
                    }
                }
                Ok(ReceiveOutcome::Dropped(_)) => continue,
                Err(BridgeError::Transport(TransportError::Closed)) => {
                    info!("transport closed, stopping receive loop");
                    break;
                }
                Err(err) if err.is_recoverable() => {
                    debug!(error = %err, "receive interrupted");
                    continue;
                }
                Err(err) => return Err(err),
            }
        }
        Ok(self.stats)
    }

    pub fn stats(&self) -> SubscriberStats {
        self.stats
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    /// Consume the subscriber and return the receiver.
    pub fn into_inner(self) -> R {
        self.receiver
    }
}
