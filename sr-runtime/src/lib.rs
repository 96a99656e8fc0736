/// Classifiers look at a frame without modifying it and decide which kind of frame it is. The
/// router uses the answer to pick the processor that handles the frame.
pub mod classifier;

/// Processors do the per-frame work once a frame has been classified: answering ARP requests,
/// learning from ARP replies, and handing IPv4 traffic over to the forwarding stage.
pub mod processor;

/// The ARP side of the router: the resolution cache, the background task that sweeps expired
/// bindings out of it, and the responder that answers requests for our own addresses.
pub mod arp;

/// The boundary to the forwarding stage. Routing lookups, TTL and checksum rewriting and ICMP
/// generation all live on the other side of the `Forwarder` trait.
pub mod forward;

/// Interface records (name, IPv4 address, MAC address) and the table the router looks them up in.
pub mod interface;

/// The boundary to the packet I/O layer that delivers received frames and sends our replies.
pub mod transport;

/// The router itself: shared state, initialization, and the per-frame entry point that ties the
/// classifier and processors together.
pub mod router;

mod error;
pub use self::error::*;

/// Utility module
pub mod utils;
