//! # Oscine Server
//! Receive-side machinery for the Open Sound Control 1.0 protocol: an
//! address-pattern dispatcher, time-tag-driven bundle scheduling, and a
//! UDP receive loop with deadline/cancellation and transient-error
//! back-off.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub mod shared {
    pub use oscine_shared::{
        Argument, Bundle, DecodeError, Message, Packet, Timetag, MAX_BUNDLE_DEPTH,
        MAX_PACKET_SIZE,
    };
}

mod context;
mod dispatcher;
mod error;
mod pattern;
mod server;

pub use context::ServeContext;
pub use dispatcher::{Dispatcher, Handler};
pub use error::{RegisterError, ServerError};
pub use server::{Server, ServerConfig};
