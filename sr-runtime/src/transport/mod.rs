use sr_packets::PacketData;
use std::io;
use std::sync::Arc;

/// The packet I/O layer, as seen from the router.
///
/// Received frames come in through `Router::on_frame_received`; this is the way back out. The
/// router calls `transmit` at most once per received frame, and hands over ownership of the
/// buffer when it does.
pub trait Transport: Send + Sync {
    fn transmit(&self, frame: PacketData, interface: &str) -> io::Result<()>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn transmit(&self, frame: PacketData, interface: &str) -> io::Result<()> {
        (**self).transmit(frame, interface)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn transmit(&self, frame: PacketData, interface: &str) -> io::Result<()> {
        (**self).transmit(frame, interface)
    }
}
