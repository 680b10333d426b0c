use camwire_bridge::config::{DEFAULT_PUBLISH_ADDRESS, DEFAULT_SUBSCRIBE_ADDRESS};
use camwire_bridge::PatternFormat;
use camwire_frame::{WireFormat, DEFAULT_TOPIC};
use clap::{Args, Subcommand, ValueEnum};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod publish;
pub mod subscribe;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Publish a synthetic camera stream.
    Publish(PublishArgs),
    /// Receive, decode and print frames.
    Subscribe(SubscribeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Publish(args) => publish::run(args),
        Command::Subscribe(args) => subscribe::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// A frame count, when given, must be positive.
pub(crate) fn validate_count(count: Option<u64>) -> CliResult<()> {
    match count {
        Some(0) => Err(CliError::new(USAGE, "--count must be at least 1")),
        _ => Ok(()),
    }
}

/// Source pixel layout of the generated test pattern.
#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum PixelArg {
    Gray8,
    Bgr8,
    Rgb8,
}

impl From<PixelArg> for PatternFormat {
    fn from(arg: PixelArg) -> Self {
        match arg {
            PixelArg::Gray8 => PatternFormat::Gray8,
            PixelArg::Bgr8 => PatternFormat::Bgr8,
            PixelArg::Rgb8 => PatternFormat::Rgb8,
        }
    }
}

#[derive(Args, Debug)]
pub struct PublishArgs {
    /// Endpoint to bind the PUB socket to.
    #[arg(env = "CAMWIRE_PUB_ADDRESS", default_value = DEFAULT_PUBLISH_ADDRESS)]
    pub address: String,
    /// Wire encoding: raw, tagged or topic.
    #[arg(long, default_value = "raw")]
    pub wire: WireFormat,
    /// Topic stamped on each frame.
    #[arg(long, env = "CAMWIRE_TOPIC", default_value = DEFAULT_TOPIC)]
    pub topic: String,
    /// Frame width in pixels.
    #[arg(long, default_value_t = 640)]
    pub width: i32,
    /// Frame height in pixels.
    #[arg(long, default_value_t = 480)]
    pub height: i32,
    /// Source pixel layout of the generated frames.
    #[arg(long, value_enum, default_value = "bgr8")]
    pub pixel_format: PixelArg,
    /// Override the source pixel format code sent to the normalizer.
    #[arg(long)]
    pub pixel_code: Option<i32>,
    /// Delay between frames (e.g. 50ms, 1s).
    #[arg(long, default_value = "50ms")]
    pub interval: String,
    /// Stop after publishing N frames.
    #[arg(long)]
    pub count: Option<u64>,
}

#[derive(Args, Debug)]
pub struct SubscribeArgs {
    /// Endpoint to connect the SUB socket to.
    #[arg(env = "CAMWIRE_SUB_ADDRESS", default_value = DEFAULT_SUBSCRIBE_ADDRESS)]
    pub address: String,
    /// Wire encoding the publisher uses: raw, tagged or topic.
    #[arg(long, default_value = "raw")]
    pub wire: WireFormat,
    /// Topic the publisher is expected to use.
    #[arg(long, env = "CAMWIRE_TOPIC", default_value = DEFAULT_TOPIC)]
    pub expected_topic: String,
    /// Fixed frame width for the topic-prefixed encoding.
    #[arg(long, default_value_t = 640)]
    pub width: i32,
    /// Fixed frame height for the topic-prefixed encoding.
    #[arg(long, default_value_t = 480)]
    pub height: i32,
    /// Fixed channel count (1 or 3) for the topic-prefixed encoding.
    #[arg(long, default_value_t = 3)]
    pub channels: usize,
    /// Exit after printing N frames.
    #[arg(long)]
    pub count: Option<u64>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
