//! The router process: command line configuration, a stderr tracing subscriber, and (with the
//! `with-pcap` feature) libpcap I/O that feeds received frames to an `sr_runtime` router.

/// Command line flags and the configuration they produce.
pub mod config;

/// A `tracing::Subscriber` that prints to stderr.
pub mod subscriber;

/// Packet capture and injection on real interfaces.
#[cfg(feature = "with-pcap")]
pub mod pcap_io;
