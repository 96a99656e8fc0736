/// ARP Notes
/// https://tools.ietf.org/html/rfc826
///
/// The responder answers requests for the IPv4 address of the interface a request arrived on, and
/// nothing else; there is no proxy ARP. Replies addressed to us teach the cache a binding.
///
/// The cache is shared between the frame path and a single background sweep thread. All access
/// goes through `ArpCache`, which keeps its map behind one mutex and never hands out references
/// into it.
mod arp_cache;
pub use self::arp_cache::*;

mod sweeper;
pub use self::sweeper::*;

mod arp_responder;
pub use self::arp_responder::*;
