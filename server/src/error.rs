use std::io;

use thiserror::Error;

use oscine_shared::DecodeError;

/// Errors reported at handler-registration time. These are returned
/// synchronously from `register` so a configuration mistake surfaces at
/// setup, never at first dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    /// The address contains a character reserved for pattern syntax
    #[error("OSC address {address:?} may not contain reserved character {offending:?}")]
    InvalidAddressPattern { address: String, offending: char },

    /// A handler is already registered under this address
    #[error("OSC address {address:?} is already registered")]
    DuplicateAddress { address: String },
}

/// Errors surfaced by the receive path.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The supplied deadline elapsed before a datagram arrived.
    /// Expected and recoverable; never retried automatically.
    #[error("receive deadline elapsed before a datagram arrived")]
    Timeout,

    /// The datagram did not start with '/' or '#'; foreign traffic on
    /// the port, dropped by the serve loop
    #[error("datagram is not an OSC packet")]
    NotOsc,

    /// The datagram claimed to be OSC but failed to decode; fatal to
    /// that datagram only
    #[error("failed to decode datagram: {0}")]
    Decode(#[from] DecodeError),

    /// The underlying socket operation failed
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),
}
