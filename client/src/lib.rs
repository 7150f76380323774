//! # Oscine Client
//! A thin UDP wrapper around the shared wire format: encodes one OSC
//! packet and writes it as a single datagram. All of the interesting
//! protocol logic lives in `oscine-shared` and `oscine-server`; this
//! crate only fulfils the "send one packet" obligation.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use thiserror::Error;

use oscine_shared::Packet;

/// Errors surfaced by the send path.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The host/port pair did not resolve to any socket address
    #[error("could not resolve {endpoint:?} to a socket address")]
    Resolve { endpoint: String },

    /// The underlying socket operation failed
    #[error("transport error: {0}")]
    Io(#[from] io::Error),
}

/// Sends encoded OSC packets to a fixed destination, one datagram per
/// packet. No delivery guarantee beyond UDP's.
pub struct Client {
    target: SocketAddr,
    local: SocketAddr,
}

impl Client {
    /// Resolves `host:port` into the destination address. The local
    /// side defaults to an ephemeral wildcard bind of the matching
    /// address family.
    pub fn new(host: &str, port: u16) -> Result<Self, ClientError> {
        let endpoint = format!("{host}:{port}");
        let target = endpoint
            .to_socket_addrs()
            .map_err(ClientError::Io)?
            .next()
            .ok_or(ClientError::Resolve { endpoint })?;
        let local = if target.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0u16; 8], 0))
        };
        Ok(Self { target, local })
    }

    /// Overrides the local address future sends bind to.
    pub fn with_local_addr(mut self, local: SocketAddr) -> Self {
        self.local = local;
        self
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// Encodes `packet` and sends it as a single datagram.
    pub fn send(&self, packet: &Packet) -> Result<(), ClientError> {
        let bytes = packet.encode();
        let socket = UdpSocket::bind(self.local)?;
        socket.send_to(&bytes, self.target)?;
        Ok(())
    }
}
