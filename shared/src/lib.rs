//! # Oscine Shared
//! The Open Sound Control 1.0 wire format and data model, shared
//! between the oscine-server & oscine-client crates: padded-string and
//! blob primitives, typed arguments, messages, time-tagged bundles, and
//! the top-level packet decoder.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod argument;
mod bundle;
mod codec;
mod error;
mod message;
mod packet;
mod timetag;

pub use argument::Argument;
pub use bundle::Bundle;
pub use codec::{pad_len, write_blob, write_padded_string, Reader};
pub use error::DecodeError;
pub use message::Message;
pub use packet::{Packet, MAX_BUNDLE_DEPTH, MAX_PACKET_SIZE};
pub use timetag::Timetag;
