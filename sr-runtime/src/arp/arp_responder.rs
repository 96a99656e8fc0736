use crate::processor::Processor;
use crate::router::RouterState;
use crate::RouterError;
use sr_packets::{ArpFrame, ArpOp, EthernetFrame, ARP_HEADER_LEN, ETHERNET_HEADER_LEN};
use std::convert::TryFrom;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::{debug, info};

/// What the responder made of an ARP frame.
#[derive(Debug)]
pub enum ArpOutcome {
    /// A request for our address; the reply must go back out the receiving interface.
    Reply(EthernetFrame),
    /// A reply addressed to us; the sender's binding was put in the cache.
    Learned(Ipv4Addr),
    /// A reply for somebody else.
    ReplyObserved,
    /// A request for an address that isn't the receiving interface's.
    NotForUs(Ipv4Addr),
}

pub struct ArpResponder {
    state: Arc<RouterState>,
}

impl ArpResponder {
    pub fn new(state: Arc<RouterState>) -> Self {
        ArpResponder { state }
    }
}

impl Processor for ArpResponder {
    type Output = ArpOutcome;

    ///
    /// From the ARP RFC: https://tools.ietf.org/html/rfc826
    ///
    /// ?Do I have the hardware type in ar$hrd, and speak the protocol in ar$pro?
    /// Yes:
    ///     ?Is the opcode ares_op$REQUEST?
    ///     Yes:
    ///         ?Am I the target protocol address?
    ///         Yes:
    ///             Swap hardware and protocol fields, putting the local hardware and protocol
    ///                 addresses in the sender fields.
    ///             Set the ar$op field to ares_op$REPLY
    ///             Send the packet to the (new) target hardware address on the same hardware on
    ///                 which the request was received.
    ///     ?Is the opcode ares_op$REPLY and am I the target protocol address?
    ///     Yes:
    ///         Add <sender protocol address, sender hardware address> to the cache.
    ///
    fn process(
        &self,
        frame: &EthernetFrame<&[u8]>,
        interface: &str,
    ) -> Result<Self::Output, RouterError> {
        let needed = ETHERNET_HEADER_LEN + ARP_HEADER_LEN;
        if frame.len() < needed {
            return Err(RouterError::Length {
                needed,
                actual: frame.len(),
            });
        }

        let request = ArpFrame::try_from(frame.clone()).map_err(RouterError::MalformedArp)?;
        let op = ArpOp::try_from(request.opcode()).map_err(RouterError::UnsupportedOperation)?;
        let record = self
            .state
            .interface(interface)
            .ok_or_else(|| RouterError::UnknownInterface(interface.to_string()))?;

        let sender_ip = request.sender_ipv4_addr();
        let sender_mac = request.sender_mac_addr();
        let target_ip = request.target_ipv4_addr();

        match op {
            ArpOp::Request => {
                if target_ip != record.ip {
                    debug!(%target_ip, %sender_ip, "ARP request is not for us");
                    return Ok(ArpOutcome::NotForUs(target_ip));
                }

                let mut reply = request.duplicate();
                reply.set_dest_mac(frame.src_mac());
                reply.set_src_mac(record.mac);
                reply.set_opcode(ArpOp::Reply as u16);
                reply.swap_protocol_addrs();
                reply.set_target_mac_addr(sender_mac);
                reply.set_sender_mac_addr(record.mac);

                debug!(%sender_ip, %sender_mac, "Answering ARP request");
                Ok(ArpOutcome::Reply(reply.into_frame()))
            }
            ArpOp::Reply => {
                if target_ip != record.ip {
                    debug!(%sender_ip, %target_ip, "Observed ARP reply for another host");
                    return Ok(ArpOutcome::ReplyObserved);
                }

                if self.state.arp_cache().insert(sender_ip, sender_mac) != Some(sender_mac) {
                    info!(ip = %sender_ip, mac = %sender_mac, "Learned ARP binding");
                }
                Ok(ArpOutcome::Learned(sender_ip))
            }
        }
    }
}
