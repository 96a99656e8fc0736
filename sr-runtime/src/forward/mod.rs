use crate::processor::Processor;
use crate::router::RouterState;
use crate::RouterError;
use sr_packets::{EthernetFrame, ETHERNET_HEADER_LEN, IPV4_MIN_HEADER_LEN};
use std::sync::Arc;
use tracing::trace;

/// The forwarding stage that takes over IPv4 traffic.
///
/// Routing lookups, TTL and checksum rewriting, ICMP generation and queueing packets while a next
/// hop is being resolved all happen behind this trait. Implementations get the frame exactly as
/// it was received and can reach the interfaces and the ARP cache through `state`.
pub trait Forwarder: Send + Sync {
    fn forward(&self, state: &RouterState, frame: &EthernetFrame<&[u8]>, interface: &str);
}

impl<F: Forwarder + ?Sized> Forwarder for Arc<F> {
    fn forward(&self, state: &RouterState, frame: &EthernetFrame<&[u8]>, interface: &str) {
        (**self).forward(state, frame, interface)
    }
}

/// Forwarder for routers that have no forwarding stage attached. Frames are dropped.
#[derive(Default)]
pub struct NullForwarder {}

impl NullForwarder {
    pub fn new() -> Self {
        NullForwarder {}
    }
}

impl Forwarder for NullForwarder {
    fn forward(&self, _state: &RouterState, frame: &EthernetFrame<&[u8]>, interface: &str) {
        trace!(interface, len = frame.len(), "No forwarding stage, dropping IPv4 frame");
    }
}

/// Checks that an IPv4 frame is long enough to hold a header and hands it to the forwarder.
pub struct Ipv4Handoff<F> {
    state: Arc<RouterState>,
    forwarder: F,
}

impl<F: Forwarder> Ipv4Handoff<F> {
    pub fn new(state: Arc<RouterState>, forwarder: F) -> Self {
        Ipv4Handoff { state, forwarder }
    }

    pub fn forwarder(&self) -> &F {
        &self.forwarder
    }
}

impl<F: Forwarder> Processor for Ipv4Handoff<F> {
    type Output = ();

    fn process(&self, frame: &EthernetFrame<&[u8]>, interface: &str) -> Result<(), RouterError> {
        let header = frame.ipv4_header().map_err(|_| RouterError::Length {
            needed: ETHERNET_HEADER_LEN + IPV4_MIN_HEADER_LEN,
            actual: frame.len(),
        })?;
        trace!(
            src = %header.src_addr(),
            dest = %header.dest_addr(),
            ttl = header.ttl(),
            total_len = header.total_len(),
            "Handing off IPv4 packet"
        );

        self.forwarder.forward(&self.state, frame, interface);
        Ok(())
    }
}
