use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::thread;
use std::time::Duration;

use log::{debug, warn};

use oscine_shared::{Packet, MAX_PACKET_SIZE};

use crate::context::ServeContext;
use crate::dispatcher::{Dispatcher, Handler};
use crate::error::{RegisterError, ServerError};

/// Contains config properties which will be used by the Server
#[derive(Clone)]
pub struct ServerConfig {
    /// How often the serve loop wakes up to check for cancellation when
    /// no datagram arrives
    pub poll_interval: Duration,
    /// First back-off delay after a transient socket error
    pub backoff_initial: Duration,
    /// Back-off delay ceiling
    pub backoff_cap: Duration,
    /// Receive buffer size; OSC/UDP payloads never exceed 64 KiB
    pub max_packet_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            backoff_initial: Duration::from_millis(5),
            backoff_cap: Duration::from_secs(1),
            max_packet_size: MAX_PACKET_SIZE,
        }
    }
}

/// An OSC server: owns a UDP socket and the [`Dispatcher`] that routes
/// decoded packets to registered handlers.
///
/// The receive loop decodes one datagram at a time, in receipt order,
/// and hands each decoded packet to a dispatch thread, so handler
/// execution never delays the next receive. Register handlers before
/// calling [`Server::serve`]; late registration is safe but a packet
/// already being dispatched will not see it.
pub struct Server {
    socket: UdpSocket,
    dispatcher: Dispatcher,
    config: ServerConfig,
}

impl Server {
    /// Binds a UDP socket on `addr`. Bind port 0 to let the OS pick,
    /// then recover it through [`Server::local_addr`].
    pub fn bind(addr: impl ToSocketAddrs, config: ServerConfig) -> io::Result<Self> {
        Ok(Self {
            socket: UdpSocket::bind(addr)?,
            dispatcher: Dispatcher::new(),
            config,
        })
    }

    /// The bound local address.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Registers a message handler; shorthand for
    /// `dispatcher().register(..)`.
    pub fn handle(
        &self,
        address: &str,
        handler: impl Handler + 'static,
    ) -> Result<(), RegisterError> {
        self.dispatcher.register(address, handler)
    }

    /// Receives a single datagram, decodes it as one OSC packet using
    /// the datagram length as the total input length, and attaches the
    /// sender's address.
    ///
    /// With a deadline, returns [`ServerError::Timeout`] if no datagram
    /// arrives in time; with `None` it blocks indefinitely. Foreign
    /// (non-OSC) datagrams are [`ServerError::NotOsc`].
    pub fn receive_one(&self, deadline: Option<Duration>) -> Result<Packet, ServerError> {
        if let Some(deadline) = deadline {
            if deadline.is_zero() {
                return Err(ServerError::Timeout);
            }
        }
        self.socket
            .set_read_timeout(deadline)
            .map_err(ServerError::Transport)?;

        let mut buf = vec![0u8; self.config.max_packet_size];
        let (len, peer) = match self.socket.recv_from(&mut buf) {
            Ok(received) => received,
            Err(err)
                if deadline.is_some()
                    && matches!(
                        err.kind(),
                        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
                    ) =>
            {
                return Err(ServerError::Timeout);
            }
            Err(err) => return Err(ServerError::Transport(err)),
        };

        let mut packet = Packet::decode(&buf[..len])?.ok_or(ServerError::NotOsc)?;
        packet.set_source(peer);
        Ok(packet)
    }

    /// Runs the receive loop until the context is cancelled (`Ok`), its
    /// deadline elapses ([`ServerError::Timeout`]), or a fatal
    /// transport error occurs.
    ///
    /// Malformed datagrams are logged at `warn` and dropped; the loop
    /// keeps serving. Transient socket errors are retried with
    /// exponential back-off from `backoff_initial` up to `backoff_cap`.
    pub fn serve(&self, ctx: &ServeContext) -> Result<(), ServerError> {
        let mut backoff = Duration::ZERO;
        loop {
            if ctx.is_cancelled() {
                return Ok(());
            }
            if ctx.deadline_elapsed() {
                return Err(ServerError::Timeout);
            }

            let wait = match ctx.remaining() {
                Some(remaining) => remaining.min(self.config.poll_interval),
                None => self.config.poll_interval,
            };

            match self.receive_one(Some(wait)) {
                Ok(packet) => {
                    backoff = Duration::ZERO;
                    let dispatcher = self.dispatcher.clone();
                    thread::spawn(move || dispatcher.dispatch(&packet));
                }
                // a poll tick; the top of the loop re-checks the context
                Err(ServerError::Timeout) => continue,
                Err(err @ (ServerError::Decode(_) | ServerError::NotOsc)) => {
                    warn!("dropping undecodable datagram: {err}");
                }
                Err(ServerError::Transport(err)) if is_transient(&err) => {
                    backoff = if backoff.is_zero() {
                        self.config.backoff_initial
                    } else {
                        (backoff * 2).min(self.config.backoff_cap)
                    };
                    debug!("transient socket error ({err}), backing off {backoff:?}");
                    thread::sleep(backoff);
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Whether a socket error is worth retrying. `ConnectionReset` shows up
/// spuriously on UDP sockets under Windows when an earlier send hit a
/// closed port.
fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
            | io::ErrorKind::TimedOut
            | io::ErrorKind::ConnectionReset
    )
}
