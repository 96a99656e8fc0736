use crossbeam::channel::unbounded;
use sr_router::config::RouterConfig;
use sr_router::pcap_io::{spawn_capture, PcapTransport, StartError};
use sr_router::subscriber::StderrSubscriber;
use sr_runtime::router::RouterBuilder;
use std::process;
use tracing::{error, info};

fn run(config: RouterConfig) -> Result<(), StartError> {
    let transport = PcapTransport::open(&config.interfaces)?;
    let router = RouterBuilder::new()
        .interfaces(config.interfaces)
        .cache_config(config.cache)
        .transport(transport)
        .build()?;

    let (frames, received) = unbounded();
    for record in router.state().interfaces().iter() {
        spawn_capture(&record.name, frames.clone())?;
    }
    // Only the capture threads hold senders now
    drop(frames);

    for (interface, frame) in received.iter() {
        router.on_frame_received(&frame, &interface);
    }

    info!("Every capture has stopped");
    Ok(())
}

fn main() {
    let config = RouterConfig::from_args();

    let subscriber = StderrSubscriber::new(config.log_level);
    tracing::subscriber::set_global_default(subscriber).expect("setting tracing default failed");

    if let Err(err) = run(config) {
        error!(%err, "Router failed");
        process::exit(1);
    }
}
