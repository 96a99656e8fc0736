use crossbeam::channel::Receiver;
use maplit::hashmap;
use sr_packets::{ArpFrame, ArpOp, EthernetFrame, MacAddr, PacketData, ARP_ETHER_TYPE};
use sr_runtime::arp::CacheConfig;
use sr_runtime::interface::{InterfaceRecord, InterfaceTable};
use sr_runtime::router::{Router, RouterBuilder};
use sr_runtime::utils::test::frames::{arp_reply_frame, arp_request_frame, ipv4_frame};
use sr_runtime::utils::test::{ChannelTransport, RecordingForwarder};
use std::convert::TryFrom;
use std::net::Ipv4Addr;
use std::thread;
use std::time::{Duration, Instant};

const ETH0_IP: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 1);
const ETH1_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 1);
const HOST_IP: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 2);

fn eth0_mac() -> MacAddr {
    "bb:bb:bb:bb:bb:02".parse().unwrap()
}

fn eth1_mac() -> MacAddr {
    "bb:bb:bb:bb:bb:03".parse().unwrap()
}

fn host_mac() -> MacAddr {
    "aa:aa:aa:aa:aa:01".parse().unwrap()
}

fn interfaces() -> InterfaceTable {
    InterfaceTable::from(hashmap! {
        String::from("eth0") => InterfaceRecord::new("eth0", ETH0_IP, eth0_mac()),
        String::from("eth1") => InterfaceRecord::new("eth1", ETH1_IP, eth1_mac()),
    })
}

type Collected = Receiver<(String, PacketData)>;

fn router_with(
    cache_config: CacheConfig,
) -> (
    Router<ChannelTransport, RecordingForwarder>,
    Collected,
    Collected,
) {
    let (transport, transmitted) = ChannelTransport::new();
    let (forwarder, forwarded) = RecordingForwarder::new();
    let router = RouterBuilder::new()
        .interfaces(interfaces())
        .cache_config(cache_config)
        .transport(transport)
        .forwarder(forwarder)
        .build()
        .unwrap();
    (router, transmitted, forwarded)
}

fn router() -> (
    Router<ChannelTransport, RecordingForwarder>,
    Collected,
    Collected,
) {
    router_with(CacheConfig::default())
}

#[test]
fn short_frames_are_dropped() {
    let (router, transmitted, forwarded) = router();
    let request = arp_request_frame(host_mac(), HOST_IP, ETH0_IP);

    for len in 0..14 {
        router.on_frame_received(&request[..len], "eth0");
    }

    assert!(transmitted.is_empty());
    assert!(forwarded.is_empty());
}

#[test]
fn request_for_interface_gets_exactly_one_reply() {
    let (router, transmitted, forwarded) = router();
    let request = arp_request_frame(host_mac(), HOST_IP, ETH0_IP);

    router.on_frame_received(&request, "eth0");

    let (interface, reply) = transmitted.try_recv().unwrap();
    assert!(transmitted.try_recv().is_err());
    assert!(forwarded.is_empty());
    assert_eq!(interface, "eth0");

    let reply = EthernetFrame::from_buffer(reply, 0).unwrap();
    assert_eq!(reply.dest_mac(), host_mac());
    assert_eq!(reply.src_mac(), eth0_mac());
    assert_eq!(reply.ether_type(), ARP_ETHER_TYPE);

    let reply = ArpFrame::try_from(reply).unwrap();
    assert_eq!(reply.opcode(), ArpOp::Reply as u16);
    assert_eq!(reply.sender_ipv4_addr(), ETH0_IP);
    assert_eq!(reply.sender_mac_addr(), eth0_mac());
    assert_eq!(reply.target_ipv4_addr(), HOST_IP);
    assert_eq!(reply.target_mac_addr(), host_mac());
}

#[test]
fn reply_goes_out_the_receiving_interface() {
    let (router, transmitted, _) = router();
    let request = arp_request_frame(
        MacAddr::new([0xcc; 6]),
        Ipv4Addr::new(192, 168, 1, 20),
        ETH1_IP,
    );

    router.on_frame_received(&request, "eth1");

    let (interface, reply) = transmitted.try_recv().unwrap();
    assert_eq!(interface, "eth1");
    let reply = ArpFrame::try_from(EthernetFrame::from_buffer(reply, 0).unwrap()).unwrap();
    assert_eq!(reply.sender_mac_addr(), eth1_mac());
}

#[test]
fn every_matching_request_is_answered() {
    let (router, transmitted, _) = router();
    let request = arp_request_frame(host_mac(), HOST_IP, ETH0_IP);

    for _ in 0..5 {
        router.on_frame_received(&request, "eth0");
    }

    assert_eq!(transmitted.len(), 5);
}

#[test]
fn request_for_another_address_gets_no_reply() {
    let (router, transmitted, forwarded) = router();
    let request = arp_request_frame(host_mac(), HOST_IP, Ipv4Addr::new(10, 0, 0, 9));

    router.on_frame_received(&request, "eth0");

    assert!(transmitted.is_empty());
    assert!(forwarded.is_empty());
    assert!(router.state().arp_cache().is_empty());
}

#[test]
fn request_for_another_interfaces_address_gets_no_reply() {
    let (router, transmitted, _) = router();
    let request = arp_request_frame(host_mac(), HOST_IP, ETH1_IP);

    router.on_frame_received(&request, "eth0");

    assert!(transmitted.is_empty());
}

#[test]
fn request_on_unknown_interface_gets_no_reply() {
    let (router, transmitted, _) = router();
    let request = arp_request_frame(host_mac(), HOST_IP, ETH0_IP);

    router.on_frame_received(&request, "wlan0");

    assert!(transmitted.is_empty());
}

#[test]
fn replies_are_never_echoed() {
    let (router, transmitted, forwarded) = router();

    let for_us = arp_reply_frame(host_mac(), HOST_IP, eth0_mac(), ETH0_IP);
    router.on_frame_received(&for_us, "eth0");

    let for_someone_else = arp_reply_frame(
        host_mac(),
        HOST_IP,
        MacAddr::new([0xcc; 6]),
        Ipv4Addr::new(10, 0, 0, 3),
    );
    router.on_frame_received(&for_someone_else, "eth0");

    assert!(transmitted.is_empty());
    assert!(forwarded.is_empty());
    assert_eq!(router.state().arp_cache().lookup(HOST_IP), Some(host_mac()));
    assert_eq!(router.state().arp_cache().len(), 1);
}

#[test]
fn foreign_address_families_are_dropped() {
    let (router, transmitted, _) = router();
    let request = arp_request_frame(host_mac(), HOST_IP, ETH0_IP);

    // Hardware type, protocol type, hardware and protocol address lengths
    for &(offset, value) in &[(15, 6), (17, 0xdd), (18, 8), (19, 16)] {
        let mut foreign = request.clone();
        foreign[offset] = value;
        router.on_frame_received(&foreign, "eth0");
    }

    // Unknown operation
    let mut rarp = request.clone();
    rarp[21] = 3;
    router.on_frame_received(&rarp, "eth0");

    // Header cut short
    router.on_frame_received(&request[..41], "eth0");

    assert!(transmitted.is_empty());
}

#[test]
fn padded_request_is_answered() {
    let (router, transmitted, _) = router();
    let mut request = arp_request_frame(host_mac(), HOST_IP, ETH0_IP);
    request.resize(60, 0);

    router.on_frame_received(&request, "eth0");

    let (_, reply) = transmitted.try_recv().unwrap();
    assert_eq!(reply.len(), 60);
}

#[test]
fn ipv4_is_handed_off_once_unmodified() {
    let (router, transmitted, forwarded) = router();
    let frame = ipv4_frame(HOST_IP, Ipv4Addr::new(172, 16, 0, 1), b"payload");
    let original = frame.clone();

    router.on_frame_received(&frame, "eth0");

    let (interface, bytes) = forwarded.try_recv().unwrap();
    assert!(forwarded.try_recv().is_err());
    assert_eq!(interface, "eth0");
    assert_eq!(bytes, original);
    assert_eq!(frame, original);
    assert!(transmitted.is_empty());
}

#[test]
fn short_ipv4_is_not_handed_off() {
    let (router, _, forwarded) = router();
    let frame = ipv4_frame(HOST_IP, Ipv4Addr::new(172, 16, 0, 1), &[]);

    router.on_frame_received(&frame[..33], "eth0");

    assert!(forwarded.is_empty());
}

#[test]
fn other_ether_types_are_ignored() {
    let (router, transmitted, forwarded) = router();
    let mut frame = ipv4_frame(HOST_IP, Ipv4Addr::new(172, 16, 0, 1), &[]);
    frame[12] = 0x88;
    frame[13] = 0xcc;

    router.on_frame_received(&frame, "eth0");

    assert!(transmitted.is_empty());
    assert!(forwarded.is_empty());
}

#[test]
fn learned_bindings_are_swept() {
    let (router, _, _) = router_with(CacheConfig::new(
        Duration::from_millis(50),
        Duration::from_millis(10),
    ));
    let reply = arp_reply_frame(host_mac(), HOST_IP, eth0_mac(), ETH0_IP);

    router.on_frame_received(&reply, "eth0");
    assert_eq!(router.state().arp_cache().lookup(HOST_IP), Some(host_mac()));

    let deadline = Instant::now() + Duration::from_secs(5);
    while !router.state().arp_cache().is_empty() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(10));
    }
    assert!(router.state().arp_cache().is_empty());
    assert_eq!(router.state().arp_cache().lookup(HOST_IP), None);
}

#[test]
fn frames_from_many_threads() {
    let (router, transmitted, forwarded) = router();
    let router = std::sync::Arc::new(router);

    let workers: Vec<_> = (0..4)
        .map(|n| {
            let router = std::sync::Arc::clone(&router);
            thread::spawn(move || {
                let sender = Ipv4Addr::new(10, 0, 1, n);
                let request = arp_request_frame(host_mac(), sender, ETH0_IP);
                let reply = arp_reply_frame(host_mac(), sender, eth0_mac(), ETH0_IP);
                let ip = ipv4_frame(sender, ETH1_IP, &[]);
                for _ in 0..25 {
                    router.on_frame_received(&request, "eth0");
                    router.on_frame_received(&reply, "eth0");
                    router.on_frame_received(&ip, "eth0");
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(transmitted.len(), 100);
    assert_eq!(forwarded.len(), 100);
    assert_eq!(router.state().arp_cache().len(), 4);
}
