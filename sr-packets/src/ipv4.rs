use crate::*;
use std::net::Ipv4Addr;

/// Read access to the fixed 20 byte part of an IPv4 header.
///
/// The router front end only checks that a header is present before handing the frame to the
/// forwarding stage, and logs a few of its fields. TTL and checksum rewriting happen downstream.
#[derive(Clone, Debug)]
pub struct Ipv4Header<T = PacketData> {
    pub data: T,
    pub layer3_offset: usize,
}

impl<T: AsRef<[u8]>> Ipv4Header<T> {
    pub fn from_buffer(data: T, layer3_offset: usize) -> Result<Ipv4Header<T>, &'static str> {
        // Header of Ethernet Frame: 14 bytes
        // Header of IPv4 Frame: 20 bytes
        match layer3_offset.checked_add(IPV4_MIN_HEADER_LEN) {
            Some(end) if end <= data.as_ref().len() => {}
            _ => return Err("Data is too short to be an IPv4 Packet"),
        }

        Ok(Ipv4Header {
            data,
            layer3_offset,
        })
    }

    fn header(&self) -> &[u8] {
        &self.data.as_ref()[self.layer3_offset..self.layer3_offset + IPV4_MIN_HEADER_LEN]
    }

    pub fn total_len(&self) -> u16 {
        let header = self.header();
        u16::from_be_bytes([header[2], header[3]])
    }

    pub fn ttl(&self) -> u8 {
        self.header()[8]
    }

    pub fn src_addr(&self) -> Ipv4Addr {
        let h = self.header();
        Ipv4Addr::new(h[12], h[13], h[14], h[15])
    }

    pub fn dest_addr(&self) -> Ipv4Addr {
        let h = self.header();
        Ipv4Addr::new(h[16], h[17], h[18], h[19])
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Ipv4Header<T> {
    fn header_mut(&mut self) -> &mut [u8] {
        let start = self.layer3_offset;
        &mut self.data.as_mut()[start..start + IPV4_MIN_HEADER_LEN]
    }

    pub fn set_src_addr(&mut self, addr: Ipv4Addr) {
        self.header_mut()[12..16].copy_from_slice(&addr.octets());
    }

    pub fn set_dest_addr(&mut self, addr: Ipv4Addr) {
        self.header_mut()[16..20].copy_from_slice(&addr.octets());
    }
}

impl<T: AsRef<[u8]>> EthernetFrame<T> {
    /// Views the payload as an IPv4 header without copying.
    pub fn ipv4_header(&self) -> Result<Ipv4Header<&[u8]>, &'static str> {
        if self.ether_type() != IPV4_ETHER_TYPE {
            return Err("Frame does not have IPv4 ether type");
        }
        Ipv4Header::from_buffer(self.data.as_ref(), self.payload_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_data() -> Vec<u8> {
        vec![
            0xde, 0xad, 0xbe, 0xef, 0xff, 0xff, 1, 2, 3, 4, 5, 6, 0x08, 0x00, 0x45, 0, 0, 20, 0, 0,
            0, 0, 64, 17, 0, 0, 192, 178, 128, 0, 10, 0, 0, 1,
        ]
    }

    #[test]
    fn ipv4_header() {
        let header = Ipv4Header::from_buffer(frame_data(), 14).unwrap();

        assert_eq!(header.total_len(), 20);
        assert_eq!(header.ttl(), 64);
        assert_eq!(header.src_addr(), Ipv4Addr::new(192, 178, 128, 0));
        assert_eq!(header.dest_addr(), Ipv4Addr::new(10, 0, 0, 1));
    }

    #[test]
    fn too_short() {
        let data = frame_data();
        assert!(Ipv4Header::from_buffer(&data[..33], 14).is_err());
        assert!(Ipv4Header::from_buffer(&data[..], 14).is_ok());
        assert!(Ipv4Header::from_buffer(&data[..], 15).is_err());
    }

    #[test]
    fn offset_past_end() {
        let data = frame_data();
        assert!(Ipv4Header::from_buffer(&data[..], usize::MAX).is_err());
        assert!(Ipv4Header::from_buffer(&data[..], usize::MAX - 19).is_err());
    }

    #[test]
    fn setters() {
        let mut header = Ipv4Header::from_buffer(frame_data(), 14).unwrap();
        header.set_src_addr(Ipv4Addr::new(10, 0, 0, 2));
        header.set_dest_addr(Ipv4Addr::new(10, 0, 0, 3));
        assert_eq!(header.src_addr(), Ipv4Addr::new(10, 0, 0, 2));
        assert_eq!(header.dest_addr(), Ipv4Addr::new(10, 0, 0, 3));
    }

    #[test]
    fn from_ethernet_frame() {
        let data = frame_data();
        let frame = EthernetFrame::from_buffer(&data[..], 0).unwrap();
        let header = frame.ipv4_header().unwrap();
        assert_eq!(header.dest_addr(), Ipv4Addr::new(10, 0, 0, 1));

        let mut arp = EthernetFrame::from_buffer(data, 0).unwrap();
        arp.set_ether_type(ARP_ETHER_TYPE);
        assert!(arp.ipv4_header().is_err());

        let data = frame_data();
        let short = EthernetFrame::from_buffer(&data[..30], 0).unwrap();
        assert!(short.ipv4_header().is_err());
    }
}
