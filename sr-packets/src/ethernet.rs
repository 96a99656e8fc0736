use crate::*;

/// Ethernet II frame over any byte buffer.
///
/// Borrowed buffers (`EthernetFrame<&[u8]>`) give read-only access to bytes owned by someone
/// else, e.g. the transport that handed us a received frame. Owned buffers (the default,
/// `PacketData`) can be rewritten in place.
#[derive(Clone, Debug)]
pub struct EthernetFrame<T = PacketData> {
    pub data: T,
    pub layer2_offset: usize,
    pub payload_offset: usize,
}

impl<T> Packet for EthernetFrame<T> {}

impl<T: AsRef<[u8]>> EthernetFrame<T> {
    pub fn from_buffer(frame: T, layer2_offset: usize) -> Result<EthernetFrame<T>, &'static str> {
        // Ethernet II frames must be at least the header, which is 14bytes
        // 0                    6                    12                      14
        // |---6 byte Dest_MAC--|---6 byte Src_MAC---|--2 Byte EtherType---|
        // We could support other formats for the frames, but IP sits atop Ethernet II

        let payload_offset = match layer2_offset.checked_add(ETHERNET_HEADER_LEN) {
            Some(offset) if offset <= frame.as_ref().len() => offset,
            _ => return Err("Frame is less than the minimum of 14 bytes"),
        };

        Ok(EthernetFrame {
            data: frame,
            layer2_offset,
            payload_offset, // 802.1Q tags would move this
        })
    }

    fn header(&self) -> &[u8] {
        &self.data.as_ref()[self.layer2_offset..self.payload_offset]
    }

    pub fn dest_mac(&self) -> MacAddr {
        MacAddr::from_slice(&self.header()[0..6])
    }

    pub fn src_mac(&self) -> MacAddr {
        MacAddr::from_slice(&self.header()[6..12])
    }

    pub fn ether_type(&self) -> u16 {
        let header = self.header();
        u16::from_be_bytes([header[12], header[13]])
    }

    pub fn payload(&self) -> &[u8] {
        &self.data.as_ref()[self.payload_offset..]
    }

    /// The frame, starting at the Ethernet header.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data.as_ref()[self.layer2_offset..]
    }

    /// Length of the frame from the start of the Ethernet header.
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Always false, a frame holds at least its header.
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// Copies the frame into a newly allocated buffer that can be rewritten.
    pub fn duplicate(&self) -> EthernetFrame<PacketData> {
        EthernetFrame {
            data: self.as_bytes().to_vec(),
            layer2_offset: 0,
            payload_offset: self.payload_offset - self.layer2_offset,
        }
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> EthernetFrame<T> {
    fn header_mut(&mut self) -> &mut [u8] {
        let (start, end) = (self.layer2_offset, self.payload_offset);
        &mut self.data.as_mut()[start..end]
    }

    pub fn set_dest_mac(&mut self, mac: MacAddr) {
        self.header_mut()[..6].copy_from_slice(&mac.bytes);
    }

    pub fn set_src_mac(&mut self, mac: MacAddr) {
        self.header_mut()[6..12].copy_from_slice(&mac.bytes);
    }

    pub fn set_ether_type(&mut self, ether_type: u16) {
        self.header_mut()[12..14].copy_from_slice(&ether_type.to_be_bytes());
    }

    pub fn payload_mut(&mut self) -> &mut [u8] {
        let start = self.payload_offset;
        &mut self.data.as_mut()[start..]
    }
}

impl EthernetFrame<PacketData> {
    /// Returns an empty EthernetFrame where all values all populated to zero. This function allocates a
    /// new array to hold the header.
    pub fn empty() -> EthernetFrame {
        EthernetFrame {
            data: vec![0; ETHERNET_HEADER_LEN],
            layer2_offset: 0,
            payload_offset: ETHERNET_HEADER_LEN,
        }
    }

    pub fn set_payload(&mut self, payload: &[u8]) {
        self.data.truncate(self.payload_offset);
        self.data.reserve_exact(payload.len());
        self.data.extend_from_slice(payload);
    }

    /// Hands the underlying buffer back, starting at the Ethernet header.
    pub fn into_data(mut self) -> PacketData {
        if self.layer2_offset > 0 {
            self.data.drain(..self.layer2_offset);
        }
        self.data
    }
}

/// EthernetFrames are considered the same if they have the same data from the layer 2
/// header and onward. This function does not consider the data before the start of the
/// Ethernet header
impl<T: AsRef<[u8]>, U: AsRef<[u8]>> PartialEq<EthernetFrame<U>> for EthernetFrame<T> {
    fn eq(&self, other: &EthernetFrame<U>) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<T: AsRef<[u8]>> Eq for EthernetFrame<T> {}
