use std::fmt;
use std::str::FromStr;

/// Owned storage behind every packet type that is built or rewritten in place.
pub type PacketData = Vec<u8>;

/// Marker for types that wrap a packet buffer.
pub trait Packet {}

/// Ethernet II header: 6 byte destination, 6 byte source, 2 byte EtherType.
pub const ETHERNET_HEADER_LEN: usize = 14;

/// ARP header for the Ethernet/IPv4 combination: 8 fixed bytes plus two
/// (6 byte MAC, 4 byte IPv4) address pairs.
pub const ARP_HEADER_LEN: usize = 28;

/// IPv4 header without options.
pub const IPV4_MIN_HEADER_LEN: usize = 20;

pub const IPV4_ETHER_TYPE: u16 = 0x0800;
pub const ARP_ETHER_TYPE: u16 = 0x0806;
pub const IPV6_ETHER_TYPE: u16 = 0x86DD;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct MacAddr {
    pub bytes: [u8; 6],
}

impl MacAddr {
    pub const BROADCAST: MacAddr = MacAddr { bytes: [0xff; 6] };

    pub fn new(bytes: [u8; 6]) -> MacAddr {
        MacAddr { bytes }
    }

    pub(crate) fn from_slice(slice: &[u8]) -> MacAddr {
        let mut bytes = [0u8; 6];
        bytes.copy_from_slice(&slice[..6]);
        MacAddr { bytes }
    }

    pub fn is_broadcast(&self) -> bool {
        *self == MacAddr::BROADCAST
    }
}

impl From<[u8; 6]> for MacAddr {
    fn from(bytes: [u8; 6]) -> Self {
        MacAddr::new(bytes)
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let b = &self.bytes;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

/// Parses the colon separated form, e.g. `bb:bb:bb:bb:bb:02`. Case is ignored.
impl FromStr for MacAddr {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 6];
        let mut octets = s.split(':');
        for byte in bytes.iter_mut() {
            let octet = octets.next().ok_or("MAC address has fewer than 6 octets")?;
            if octet.is_empty() || octet.len() > 2 {
                return Err("MAC address octet must be 1 or 2 hex digits");
            }
            *byte = u8::from_str_radix(octet, 16).map_err(|_| "MAC address octet is not hex")?;
        }
        if octets.next().is_some() {
            return Err("MAC address has more than 6 octets");
        }
        Ok(MacAddr { bytes })
    }
}
