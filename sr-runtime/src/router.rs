use crate::arp::{spawn_sweeper, ArpCache, ArpOutcome, ArpResponder, CacheConfig};
use crate::classifier::{Classifier, EtherTypeClassifier, FrameClass};
use crate::forward::{Forwarder, Ipv4Handoff, NullForwarder};
use crate::interface::{InterfaceRecord, InterfaceTable};
use crate::processor::Processor;
use crate::transport::Transport;
use crate::RouterError;
use sr_packets::{EthernetFrame, ETHERNET_HEADER_LEN};
use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::{debug, info, trace, trace_span, warn};

/// Everything the frame handlers share: the interface table and the ARP cache.
///
/// There is one of these per router, created at startup and handed around as an
/// `Arc<RouterState>`.
pub struct RouterState {
    interfaces: InterfaceTable,
    arp_cache: Arc<ArpCache>,
}

impl RouterState {
    pub fn new(interfaces: InterfaceTable, cache_config: CacheConfig) -> Self {
        RouterState {
            interfaces,
            arp_cache: Arc::new(ArpCache::new(cache_config)),
        }
    }

    /// The record for the interface called `name`.
    pub fn interface(&self, name: &str) -> Option<&InterfaceRecord> {
        self.interfaces.get(name)
    }

    pub fn interfaces(&self) -> &InterfaceTable {
        &self.interfaces
    }

    pub fn arp_cache(&self) -> &Arc<ArpCache> {
        &self.arp_cache
    }
}

/// What happened to a frame handed to `Router::dispatch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// An ARP request for one of our addresses was answered.
    Replied,
    /// An IPv4 frame went to the forwarding stage.
    Forwarded,
    /// An ARP reply addressed to us updated the cache.
    Learned(Ipv4Addr),
    /// An ARP reply for another host went by.
    ReplyObserved,
    /// An ARP request for an address that isn't ours.
    NotForUs(Ipv4Addr),
    /// Neither ARP nor IPv4; carries the ether type.
    Ignored(u16),
}

/// The router front end: classifies each received frame and sends it to the ARP responder or the
/// IPv4 hand-off.
pub struct Router<T, F = NullForwarder> {
    state: Arc<RouterState>,
    classifier: EtherTypeClassifier,
    arp: ArpResponder,
    ipv4: Ipv4Handoff<F>,
    transport: T,
}

impl<T: Transport, F: Forwarder> Router<T, F> {
    /// Brings the router up around `state` and starts the ARP cache sweep thread, unless one is
    /// already running for `state`'s cache.
    ///
    /// Failing to start the sweep thread is the only way this can fail.
    pub fn initialize(
        state: Arc<RouterState>,
        transport: T,
        forwarder: F,
    ) -> Result<Self, RouterError> {
        let started = spawn_sweeper(state.arp_cache()).map_err(RouterError::StartupFailure)?;

        for record in state.interfaces().iter() {
            info!(interface = %record.name, ip = %record.ip, mac = %record.mac, "Interface up");
        }
        if started.is_some() {
            let config = state.arp_cache().config();
            info!(
                timeout = ?config.entry_timeout,
                interval = ?config.sweep_interval,
                "Started ARP cache sweep"
            );
        }

        Ok(Router {
            arp: ArpResponder::new(Arc::clone(&state)),
            ipv4: Ipv4Handoff::new(Arc::clone(&state), forwarder),
            classifier: EtherTypeClassifier::new(),
            state,
            transport,
        })
    }

    pub fn state(&self) -> &Arc<RouterState> {
        &self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn forwarder(&self) -> &F {
        self.ipv4.forwarder()
    }

    /// Entry point for the transport, called once per received frame.
    ///
    /// Never fails: a frame that can't be handled is logged and dropped. `frame` is only borrowed
    /// for the duration of the call.
    pub fn on_frame_received(&self, frame: &[u8], interface: &str) {
        let span = trace_span!("frame", interface, len = frame.len());
        let _enter = span.enter();
        trace!("Received frame");

        match self.dispatch(frame, interface) {
            Ok(disposition) => trace!(?disposition, "Handled frame"),
            Err(err) => warn!(%err, "Dropped frame"),
        }
    }

    /// Handles one frame and reports what was done with it.
    pub fn dispatch(&self, frame: &[u8], interface: &str) -> Result<Disposition, RouterError> {
        let class = self.classifier.classify(frame)?;
        let ethernet = EthernetFrame::from_buffer(frame, 0).map_err(|_| RouterError::Length {
            needed: ETHERNET_HEADER_LEN,
            actual: frame.len(),
        })?;

        match class {
            FrameClass::Arp => match self.arp.process(&ethernet, interface)? {
                ArpOutcome::Reply(reply) => {
                    self.transport
                        .transmit(reply.into_data(), interface)
                        .map_err(|source| RouterError::Transmit {
                            interface: interface.to_string(),
                            source,
                        })?;
                    Ok(Disposition::Replied)
                }
                ArpOutcome::Learned(ip) => Ok(Disposition::Learned(ip)),
                ArpOutcome::ReplyObserved => Ok(Disposition::ReplyObserved),
                ArpOutcome::NotForUs(ip) => Ok(Disposition::NotForUs(ip)),
            },
            FrameClass::Ipv4 => {
                self.ipv4.process(&ethernet, interface)?;
                Ok(Disposition::Forwarded)
            }
            FrameClass::Other(ether_type) => {
                debug!(ether_type, "Ignoring frame");
                Ok(Disposition::Ignored(ether_type))
            }
        }
    }
}

/// Collects the pieces of a `Router`. A transport is required; the forwarder defaults to
/// `NullForwarder` and the cache to `CacheConfig::default()`.
pub struct RouterBuilder<T, F = NullForwarder> {
    interfaces: InterfaceTable,
    cache_config: CacheConfig,
    transport: Option<T>,
    forwarder: F,
}

impl<T: Transport> RouterBuilder<T, NullForwarder> {
    pub fn new() -> Self {
        RouterBuilder {
            interfaces: InterfaceTable::new(),
            cache_config: CacheConfig::default(),
            transport: None,
            forwarder: NullForwarder::new(),
        }
    }
}

impl<T: Transport> Default for RouterBuilder<T, NullForwarder> {
    fn default() -> Self {
        RouterBuilder::new()
    }
}

impl<T: Transport, F: Forwarder> RouterBuilder<T, F> {
    pub fn interfaces(self, interfaces: InterfaceTable) -> Self {
        RouterBuilder {
            interfaces,
            ..self
        }
    }

    pub fn interface(mut self, record: InterfaceRecord) -> Self {
        self.interfaces.insert(record);
        self
    }

    pub fn cache_config(self, cache_config: CacheConfig) -> Self {
        RouterBuilder {
            cache_config,
            ..self
        }
    }

    pub fn transport(self, transport: T) -> Self {
        if self.transport.is_some() {
            panic!("Router may only take 1 transport")
        }

        RouterBuilder {
            transport: Some(transport),
            ..self
        }
    }

    pub fn forwarder<G: Forwarder>(self, forwarder: G) -> RouterBuilder<T, G> {
        RouterBuilder {
            interfaces: self.interfaces,
            cache_config: self.cache_config,
            transport: self.transport,
            forwarder,
        }
    }

    pub fn build(self) -> Result<Router<T, F>, RouterError> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => panic!("Cannot build router! Missing transport"),
        };

        let state = Arc::new(RouterState::new(self.interfaces, self.cache_config));
        Router::initialize(state, transport, self.forwarder)
    }
}
