use crate::RouterError;
use sr_packets::EthernetFrame;

/// Per-frame work done once a frame has been classified.
///
/// Processors see the received frame through a borrowed view; the bytes belong to the transport
/// and must be copied if anything outlives the call. The `Output` tells the router what happened,
/// and an `Err` means the frame is dropped.
pub trait Processor {
    type Output;

    fn process(
        &self,
        frame: &EthernetFrame<&[u8]>,
        interface: &str,
    ) -> Result<Self::Output, RouterError>;
}
