use std::ops::ControlFlow;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use camwire_bridge::{FrameSubscriber, SubscriberConfig};
use camwire_transport::ZmqSubscriber;
use tracing::info;

use crate::cmd::publish::install_ctrlc_handler;
use crate::cmd::{validate_count, SubscribeArgs};
use crate::exit::{bridge_error, transport_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_frame, OutputFormat};

pub fn run(args: SubscribeArgs, format: OutputFormat) -> CliResult<i32> {
    validate_count(args.count)?;
    let config = SubscriberConfig {
        format: args.wire,
        expected_topic: args.expected_topic,
        ..SubscriberConfig::default()
    }
    .with_shape(args.height, args.width, args.channels)
    .ok_or_else(|| CliError::new(USAGE, "--channels must be 1 or 3"))?;

    let socket = ZmqSubscriber::connect(&args.address)
        .map_err(|err| transport_error("connect failed", err))?;
    let mut subscriber = FrameSubscriber::new(socket, config);

    let stop = Arc::new(AtomicBool::new(false));
    install_ctrlc_handler(stop.clone())?;

    info!(address = %args.address, wire = %args.wire, "waiting for frames");

    let mut printed = 0u64;
    let stats = subscriber
        .run(&stop, |frame| {
            printed += 1;
            print_frame(frame, printed, format);
            match args.count {
                Some(count) if printed >= count => ControlFlow::Break(()),
                _ => ControlFlow::Continue(()),
            }
        })
        .map_err(|err| bridge_error("receive failed", err))?;

    info!(
        received = stats.received,
        dropped = stats.dropped,
        "subscriber stopped"
    );
    Ok(SUCCESS)
}
