use camwire_frame::{
    CodecConfig, ElementType, ImageGeometry, WireFormat, DEFAULT_GEOMETRY, DEFAULT_TOPIC,
};

/// Default bind address of the publishing socket.
pub const DEFAULT_PUBLISH_ADDRESS: &str = "tcp://*:5556";

/// Default connect address of the subscribing socket.
pub const DEFAULT_SUBSCRIBE_ADDRESS: &str = "tcp://localhost:5556";

/// Controls how the publisher encodes frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublisherConfig {
    /// Wire encoding used for every frame.
    pub format: WireFormat,
    /// Topic stamped on published frames.
    pub topic: String,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            format: WireFormat::Raw,
            topic: DEFAULT_TOPIC.to_string(),
        }
    }
}

impl PublisherConfig {
    pub fn codec_config(&self) -> CodecConfig {
        CodecConfig {
            topic: self.topic.clone(),
            ..CodecConfig::default()
        }
    }
}

/// Controls how the subscriber decodes frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberConfig {
    /// Wire encoding the producer is known to use.
    pub format: WireFormat,
    /// Topic the producer is expected to publish under.
    pub expected_topic: String,
    /// Fixed frame shape agreed out of band (topic-prefixed format only).
    pub expected_geometry: ImageGeometry,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            format: WireFormat::Raw,
            expected_topic: DEFAULT_TOPIC.to_string(),
            expected_geometry: DEFAULT_GEOMETRY,
        }
    }
}

impl SubscriberConfig {
    /// Set the fixed shape from height, width and channel count.
    ///
    /// Returns `None` for channel counts with no canonical element type.
    pub fn with_shape(mut self, height: i32, width: i32, channels: usize) -> Option<Self> {
        let element_type = ElementType::from_channels(channels)?;
        self.expected_geometry = ImageGeometry::new(height, width, element_type);
        Some(self)
    }

    pub fn codec_config(&self) -> CodecConfig {
        CodecConfig {
            topic: self.expected_topic.clone(),
            expected_geometry: self.expected_geometry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_camera() {
        let sub = SubscriberConfig::default();
        assert_eq!(sub.expected_topic, "camera/image");
        assert_eq!(sub.expected_geometry.rows, 480);
        assert_eq!(sub.expected_geometry.cols, 640);
        assert_eq!(sub.expected_geometry.element_type, ElementType::Bgr8);
        assert_eq!(PublisherConfig::default().format, WireFormat::Raw);
    }

    #[test]
    fn with_shape_maps_channels() {
        let sub = SubscriberConfig::default().with_shape(10, 20, 1).unwrap();
        assert_eq!(
            sub.expected_geometry,
            ImageGeometry::new(10, 20, ElementType::Gray8)
        );
        assert!(SubscriberConfig::default().with_shape(10, 20, 4).is_none());
    }

    #[test]
    fn codec_config_carries_topic_and_shape() {
        let sub = SubscriberConfig {
            expected_topic: "sim/cam".into(),
            ..SubscriberConfig::default()
        };
        let codec = sub.codec_config();
        assert_eq!(codec.topic, "sim/cam");
        assert_eq!(codec.expected_geometry, DEFAULT_GEOMETRY);
        assert_eq!(
            PublisherConfig {
                topic: "x".into(),
                ..PublisherConfig::default()
            }
            .codec_config()
            .topic,
            "x"
        );
    }
}
