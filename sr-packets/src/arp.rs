use crate::*;
use std::convert::TryFrom;
use std::net::Ipv4Addr;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ArpOp {
    Request = 1,
    Reply = 2,
}

impl TryFrom<u16> for ArpOp {
    type Error = u16;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(ArpOp::Request),
            2 => Ok(ArpOp::Reply),
            other => Err(other),
        }
    }
}

pub enum ArpHardwareType {
    Ethernet = 1,
}

const HARDWARE_TYPE_RANGE: (usize, usize) = (0, 2);
const PROTOCOL_TYPE_RANGE: (usize, usize) = (2, 4);
const HARDWARE_ADDR_LEN_RANGE: (usize, usize) = (4, 5);
const PROTOCOL_ADDR_LEN_RANGE: (usize, usize) = (5, 6);
const OPCODE_RANGE: (usize, usize) = (6, 8);

// Address fields for the only combination we accept: 6 byte MACs, 4 byte IPv4 addresses.
const SENDER_HARDWARE_ADDR_RANGE: (usize, usize) = (8, 14);
const SENDER_PROTOCOL_ADDR_RANGE: (usize, usize) = (14, 18);
const TARGET_HARDWARE_ADDR_RANGE: (usize, usize) = (18, 24);
const TARGET_PROTOCOL_ADDR_RANGE: (usize, usize) = (24, 28);

const ETHERNET_ADDR_LEN: u8 = 6;
const IPV4_ADDR_LEN: u8 = 4;

///
/// EthernetFrame wrapper with getters/setters for the packet structure described in RFC 826
/// https://tools.ietf.org/html/rfc826
///
/// Only Ethernet hardware addresses and IPv4 protocol addresses are supported, `try_from` rejects
/// every other combination, so the address accessors can work at fixed offsets.
///
#[derive(Clone, Debug)]
pub struct ArpFrame<T = PacketData> {
    frame: EthernetFrame<T>,
}

impl ArpFrame<PacketData> {
    ///
    /// Constructs a new, zeroed Ethernet/IPv4 ARP packet with the ARP ether type set.
    ///
    pub fn new() -> Self {
        let mut frame = EthernetFrame::empty();
        frame.set_ether_type(ARP_ETHER_TYPE);
        frame.set_payload(&[0; ARP_HEADER_LEN]);

        let mut arp_frame = ArpFrame { frame };
        arp_frame.set_hardware_type(ArpHardwareType::Ethernet as u16);
        arp_frame.set_protocol_type(IPV4_ETHER_TYPE);
        arp_frame.set_hardware_addr_len(ETHERNET_ADDR_LEN);
        arp_frame.set_protocol_addr_len(IPV4_ADDR_LEN);
        arp_frame
    }
}

impl Default for ArpFrame<PacketData> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: AsRef<[u8]>> ArpFrame<T> {
    pub fn hardware_type(&self) -> u16 {
        self.arp_u16(HARDWARE_TYPE_RANGE)
    }

    pub fn protocol_type(&self) -> u16 {
        self.arp_u16(PROTOCOL_TYPE_RANGE)
    }

    pub fn hardware_addr_len(&self) -> u8 {
        let (start, _) = HARDWARE_ADDR_LEN_RANGE;
        self.arp_data()[start]
    }

    pub fn protocol_addr_len(&self) -> u8 {
        let (start, _) = PROTOCOL_ADDR_LEN_RANGE;
        self.arp_data()[start]
    }

    pub fn opcode(&self) -> u16 {
        self.arp_u16(OPCODE_RANGE)
    }

    pub fn sender_mac_addr(&self) -> MacAddr {
        MacAddr::from_slice(self.arp_range(SENDER_HARDWARE_ADDR_RANGE))
    }

    pub fn sender_ipv4_addr(&self) -> Ipv4Addr {
        self.arp_ipv4(SENDER_PROTOCOL_ADDR_RANGE)
    }

    pub fn target_mac_addr(&self) -> MacAddr {
        MacAddr::from_slice(self.arp_range(TARGET_HARDWARE_ADDR_RANGE))
    }

    pub fn target_ipv4_addr(&self) -> Ipv4Addr {
        self.arp_ipv4(TARGET_PROTOCOL_ADDR_RANGE)
    }

    pub fn frame(&self) -> &EthernetFrame<T> {
        &self.frame
    }

    /// Copies the packet into a newly allocated buffer, e.g. to turn a request into a reply.
    pub fn duplicate(&self) -> ArpFrame<PacketData> {
        ArpFrame {
            frame: self.frame.duplicate(),
        }
    }

    // Move ownership of the frame back to the caller
    pub fn into_frame(self) -> EthernetFrame<T> {
        self.frame
    }

    // The ARP payload, from the hardware type field onward
    fn arp_data(&self) -> &[u8] {
        self.frame.payload()
    }

    fn arp_range(&self, (start, end): (usize, usize)) -> &[u8] {
        &self.arp_data()[start..end]
    }

    fn arp_u16(&self, range: (usize, usize)) -> u16 {
        let bytes = self.arp_range(range);
        u16::from_be_bytes([bytes[0], bytes[1]])
    }

    fn arp_ipv4(&self, range: (usize, usize)) -> Ipv4Addr {
        let bytes = self.arp_range(range);
        Ipv4Addr::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> ArpFrame<T> {
    pub fn set_hardware_type(&mut self, htype: u16) {
        self.set_arp_data(&htype.to_be_bytes(), HARDWARE_TYPE_RANGE);
    }

    pub fn set_protocol_type(&mut self, ptype: u16) {
        self.set_arp_data(&ptype.to_be_bytes(), PROTOCOL_TYPE_RANGE);
    }

    pub fn set_hardware_addr_len(&mut self, len: u8) {
        self.set_arp_data(&[len], HARDWARE_ADDR_LEN_RANGE);
    }

    pub fn set_protocol_addr_len(&mut self, len: u8) {
        self.set_arp_data(&[len], PROTOCOL_ADDR_LEN_RANGE);
    }

    pub fn set_opcode(&mut self, code: u16) {
        self.set_arp_data(&code.to_be_bytes(), OPCODE_RANGE);
    }

    pub fn set_sender_mac_addr(&mut self, addr: MacAddr) {
        self.set_arp_data(&addr.bytes, SENDER_HARDWARE_ADDR_RANGE);
    }

    pub fn set_sender_ipv4_addr(&mut self, addr: Ipv4Addr) {
        self.set_arp_data(&addr.octets(), SENDER_PROTOCOL_ADDR_RANGE);
    }

    pub fn set_target_mac_addr(&mut self, addr: MacAddr) {
        self.set_arp_data(&addr.bytes, TARGET_HARDWARE_ADDR_RANGE);
    }

    pub fn set_target_ipv4_addr(&mut self, addr: Ipv4Addr) {
        self.set_arp_data(&addr.octets(), TARGET_PROTOCOL_ADDR_RANGE);
    }

    /// Sender and target protocol addresses trade places.
    pub fn swap_protocol_addrs(&mut self) {
        let sender = self.sender_ipv4_addr();
        let target = self.target_ipv4_addr();
        self.set_sender_ipv4_addr(target);
        self.set_target_ipv4_addr(sender);
    }

    // Only the Ethernet addresses are writable here; the payload must keep a full ARP header
    pub fn set_dest_mac(&mut self, mac: MacAddr) {
        self.frame.set_dest_mac(mac);
    }

    pub fn set_src_mac(&mut self, mac: MacAddr) {
        self.frame.set_src_mac(mac);
    }

    fn set_arp_data(&mut self, bytes: &[u8], (start, end): (usize, usize)) {
        self.frame.payload_mut()[start..end].copy_from_slice(bytes);
    }
}

impl<T: AsRef<[u8]>> TryFrom<EthernetFrame<T>> for ArpFrame<T> {
    type Error = &'static str;

    ///
    /// Decorates the given EthernetFrame with ArpFrame getters/setters.
    /// Validates
    /// - The frame has an ARP ether type
    /// - The payload holds a full Ethernet/IPv4 ARP header. Trailing bytes are allowed, short
    ///   frames are padded up to the Ethernet minimum on the wire.
    /// - The hardware/protocol types and address lengths are Ethernet/IPv4
    ///
    fn try_from(frame: EthernetFrame<T>) -> Result<Self, Self::Error> {
        if frame.ether_type() != ARP_ETHER_TYPE {
            return Err("Frame does not have ARP ether type");
        }

        if frame.payload().len() < ARP_HEADER_LEN {
            return Err("Frame payload is too small for an ARP header");
        }

        let arp_frame = ArpFrame { frame };

        if arp_frame.hardware_type() != ArpHardwareType::Ethernet as u16 {
            return Err("ARP hardware type is not Ethernet");
        }

        if arp_frame.protocol_type() != IPV4_ETHER_TYPE {
            return Err("ARP protocol type is not IPv4");
        }

        if arp_frame.hardware_addr_len() != ETHERNET_ADDR_LEN
            || arp_frame.protocol_addr_len() != IPV4_ADDR_LEN
        {
            return Err("ARP address lengths don't match Ethernet/IPv4");
        }

        Ok(arp_frame)
    }
}
