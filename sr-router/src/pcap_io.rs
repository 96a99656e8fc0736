use crossbeam::channel::Sender;
use pcap::{Active, Capture};
use sr_packets::PacketData;
use sr_runtime::interface::InterfaceTable;
use sr_runtime::transport::Transport;
use sr_runtime::RouterError;
use std::collections::HashMap;
use std::io;
use std::sync::{Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use thiserror::Error;
use tracing::{debug, error};

// Large enough for any Ethernet frame we will see
const SNAPLEN: i32 = 65535;
// Capture threads wake up this often (ms) even when the link is quiet
const READ_TIMEOUT: i32 = 100;

#[derive(Debug, Error)]
pub enum StartError {
    #[error("failed to open interface {interface:?}: {source}")]
    Open {
        interface: String,
        #[source]
        source: pcap::Error,
    },

    #[error("failed to start the capture thread for {interface:?}: {source}")]
    Capture {
        interface: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Router(#[from] RouterError),
}

fn open(interface: &str) -> Result<Capture<Active>, StartError> {
    Capture::from_device(interface)
        .and_then(|capture| {
            capture
                .promisc(true)
                .snaplen(SNAPLEN)
                .timeout(READ_TIMEOUT)
                .open()
        })
        .map_err(|source| StartError::Open {
            interface: interface.to_string(),
            source,
        })
}

/// Sends frames through one libpcap handle per interface.
pub struct PcapTransport {
    handles: HashMap<String, Mutex<Capture<Active>>>,
}

impl PcapTransport {
    pub fn open(interfaces: &InterfaceTable) -> Result<Self, StartError> {
        let mut handles = HashMap::new();
        for record in interfaces.iter() {
            handles.insert(record.name.clone(), Mutex::new(open(&record.name)?));
        }
        Ok(PcapTransport { handles })
    }
}

impl Transport for PcapTransport {
    fn transmit(&self, frame: PacketData, interface: &str) -> io::Result<()> {
        let handle = self.handles.get(interface).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no pcap handle for {}", interface),
            )
        })?;

        handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .sendpacket(frame)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))
    }
}

/// Starts a thread that reads every frame arriving on `interface` and sends it, tagged with the
/// interface name, to `frames`. The thread stops when the receiving end hangs up or the capture
/// fails.
pub fn spawn_capture(
    interface: &str,
    frames: Sender<(String, PacketData)>,
) -> Result<JoinHandle<()>, StartError> {
    let mut capture = open(interface)?;
    let name = interface.to_string();

    thread::Builder::new()
        .name(format!("capture-{}", interface))
        .spawn(move || loop {
            match capture.next() {
                Ok(packet) => {
                    if frames.send((name.clone(), packet.data.to_vec())).is_err() {
                        debug!(interface = %name, "Frame receiver hung up, stopping capture");
                        return;
                    }
                }
                Err(pcap::Error::TimeoutExpired) => {}
                Err(err) => {
                    error!(interface = %name, %err, "Capture failed");
                    return;
                }
            }
        })
        .map_err(|source| StartError::Capture {
            interface: interface.to_string(),
            source,
        })
}
