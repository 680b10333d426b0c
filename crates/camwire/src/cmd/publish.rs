use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use camwire_bridge::{FramePublisher, PublishOutcome, PublisherConfig, TestPattern};
use camwire_transport::ZmqPublisher;
use tracing::info;

use crate::cmd::{validate_count, PublishArgs};
use crate::exit::{bridge_error, transport_error, CliError, CliResult, SUCCESS, USAGE};

pub fn run(args: PublishArgs) -> CliResult<i32> {
    let interval = parse_duration(&args.interval)?;
    validate_count(args.count)?;
    if args.width <= 0 || args.height <= 0 {
        return Err(CliError::new(USAGE, "width and height must be positive"));
    }

    let socket =
        ZmqPublisher::bind(&args.address).map_err(|err| transport_error("bind failed", err))?;
    let config = PublisherConfig {
        format: args.wire,
        topic: args.topic,
    };
    let mut publisher = FramePublisher::new(socket, config);
    let mut pattern = TestPattern::new(args.width, args.height, args.pixel_format.into());

    let stop = Arc::new(AtomicBool::new(false));
    install_ctrlc_handler(stop.clone())?;

    info!(
        address = %args.address,
        wire = %args.wire,
        width = args.width,
        height = args.height,
        "publishing test pattern"
    );

    while !stop.load(Ordering::SeqCst) {
        let mut image = pattern.next_image();
        if let Some(code) = args.pixel_code {
            image.pixel_format = code;
        }

        let outcome = publisher
            .publish_image(&image)
            .map_err(|err| bridge_error("publish failed", err))?;
        if let PublishOutcome::Sent {
            geometry,
            wire_bytes,
        } = outcome
        {
            info!(frame = pattern.frame_id(), %geometry, wire_bytes, "published frame");
        }

        if let Some(count) = args.count {
            if pattern.frame_id() >= count {
                break;
            }
        }
        std::thread::sleep(interval);
    }

    let stats = publisher.stats();
    info!(
        published = stats.published,
        dropped = stats.dropped,
        "publisher stopped"
    );
    Ok(SUCCESS)
}

pub(crate) fn install_ctrlc_handler(stop: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        stop.store(true, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}

fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "ms")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}
