use std::io;
use std::net::AddrParseError;
use thiserror::Error;

/// Everything that can go wrong while handling a frame or bringing the router up.
///
/// Per-frame errors (everything except `StartupFailure`) only ever cost the frame that caused
/// them. `Router::on_frame_received` logs them and drops the frame; nothing is retried.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("frame of {actual} bytes is shorter than the {needed} bytes required")]
    Length { needed: usize, actual: usize },

    #[error("no interface record for {0:?}")]
    UnknownInterface(String),

    #[error("unsupported ARP operation {0}")]
    UnsupportedOperation(u16),

    #[error("malformed ARP packet: {0}")]
    MalformedArp(&'static str),

    #[error("failed to transmit on {interface:?}: {source}")]
    Transmit {
        interface: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to start the ARP cache sweep task: {0}")]
    StartupFailure(#[source] io::Error),
}

/// Problems with interface records supplied as `NAME,IP,MAC`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("interface record {0:?} must look like NAME,IP,MAC")]
    Format(String),

    #[error("invalid IPv4 address in interface record {record:?}: {source}")]
    Ip {
        record: String,
        #[source]
        source: AddrParseError,
    },

    #[error("invalid MAC address in interface record {record:?}: {reason}")]
    Mac { record: String, reason: &'static str },
}
