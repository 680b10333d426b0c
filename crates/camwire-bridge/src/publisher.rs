use camwire_frame::{
    normalize, normalize_image, CanonicalFrame, Codec, FrameCodec, FrameError, ImageGeometry,
    SourceImage,
};
use camwire_transport::MultipartSender;
use tracing::{debug, warn};

use crate::config::PublisherConfig;
use crate::error::Result;

/// What happened to one source image.
#[derive(Debug)]
pub enum PublishOutcome {
    /// The frame was encoded and handed to the transport.
    Sent {
        geometry: ImageGeometry,
        wire_bytes: usize,
    },
    /// The frame was rejected before anything was sent.
    Dropped(FrameError),
}

impl PublishOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, PublishOutcome::Sent { .. })
    }
}

/// Running counters for a publisher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublisherStats {
    pub published: u64,
    pub dropped: u64,
}

/// Producer-side driver: normalize, encode, send, one frame per call.
///
/// Owns its sender; nothing else writes to it.
pub struct FramePublisher<S> {
    sender: S,
    codec: Codec,
    topic: String,
    stats: PublisherStats,
}

impl<S: MultipartSender> FramePublisher<S> {
    pub fn new(sender: S, config: PublisherConfig) -> Self {
        let codec = Codec::new(config.format, config.codec_config());
        Self {
            sender,
            codec,
            topic: config.topic,
            stats: PublisherStats::default(),
        }
    }

    /// Handle one image from the simulator callback.
    ///
    /// Per-frame problems (unknown pixel format, bad buffer length) are logged
    /// and reported as [`PublishOutcome::Dropped`] without touching the
    /// transport. Transport failures are returned as errors.
    pub fn publish_image(&mut self, image: &SourceImage) -> Result<PublishOutcome> {
        match normalize_image(image) {
            Ok(frame) => self.publish_frame(frame),
            Err(err) => Ok(self.drop_frame(err)),
        }
    }

    /// Same as [`FramePublisher::publish_image`] for borrowed callback fields.
    pub fn publish_raw(
        &mut self,
        width: i32,
        height: i32,
        pixel_format: i32,
        data: &[u8],
    ) -> Result<PublishOutcome> {
        match normalize(width, height, pixel_format, data) {
            Ok(frame) => self.publish_frame(frame),
            Err(err) => Ok(self.drop_frame(err)),
        }
    }

    /// Encode and send an already canonical frame.
    pub fn publish_frame(&mut self, frame: CanonicalFrame) -> Result<PublishOutcome> {
        let frame = if frame.topic().is_some() {
            frame
        } else {
            frame.with_topic(self.topic.clone())
        };
        let geometry = frame.geometry();

        let parts = match self.codec.encode(&frame) {
            Ok(parts) => parts,
            Err(err) => return Ok(self.drop_frame(err)),
        };
        let wire_bytes = parts.iter().map(|part| part.len()).sum();

        self.sender.send_parts(parts)?;
        self.stats.published += 1;
        debug!(%geometry, wire_bytes, format = %self.codec.format(), "published frame");

        Ok(PublishOutcome::Sent {
            geometry,
            wire_bytes,
        })
    }

    pub fn stats(&self) -> PublisherStats {
        self.stats
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    /// Borrow the underlying sender.
    pub fn get_ref(&self) -> &S {
        &self.sender
    }

    /// Consume the publisher and return the sender.
    pub fn into_inner(self) -> S {
        self.sender
    }

    fn drop_frame(&mut self, err: FrameError) -> PublishOutcome {
        self.stats.dropped += 1;
        warn!(error = %err, "dropping frame");
        PublishOutcome::Dropped(err)
    }
}
