use crate::classifier::Classifier;
use crate::RouterError;
use sr_packets::{ARP_ETHER_TYPE, ETHERNET_HEADER_LEN, IPV4_ETHER_TYPE};

/// The kinds of frames the router front end knows how to handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameClass {
    Arp,
    Ipv4,
    /// Anything else, tagged with its ether type.
    Other(u16),
}

/// Sorts raw frames by the ether type in their Ethernet II header.
#[derive(Default)]
pub struct EtherTypeClassifier {}

impl EtherTypeClassifier {
    pub fn new() -> Self {
        EtherTypeClassifier {}
    }
}

impl Classifier for EtherTypeClassifier {
    type Packet = [u8];
    type Class = Result<FrameClass, RouterError>;

    fn classify(&self, frame: &Self::Packet) -> Self::Class {
        if frame.len() < ETHERNET_HEADER_LEN {
            return Err(RouterError::Length {
                needed: ETHERNET_HEADER_LEN,
                actual: frame.len(),
            });
        }

        // Network byte order
        match u16::from_be_bytes([frame[12], frame[13]]) {
            ARP_ETHER_TYPE => Ok(FrameClass::Arp),
            IPV4_ETHER_TYPE => Ok(FrameClass::Ipv4),
            other => Ok(FrameClass::Other(other)),
        }
    }
}
