use std::net::SocketAddr;

use crate::codec::{write_padded_string, Reader};
use crate::error::DecodeError;
use crate::message::Message;
use crate::packet::{Packet, MAX_BUNDLE_DEPTH};
use crate::timetag::Timetag;

/// The fixed 8-byte start tag of every encoded bundle (7 characters
/// plus the string padding).
pub(crate) const BUNDLE_TAG: &str = "#bundle";

/// An OSC bundle: a time tag plus ordered child messages and nested
/// bundles, delivered together and dispatched when the tag falls due.
///
/// Child messages and child bundles are kept in separate ordered lists,
/// and re-encoding writes messages first; decode preserves order within
/// each kind but not the original interleaving across kinds.
#[derive(Debug, Clone, PartialEq)]
pub struct Bundle {
    pub timetag: Timetag,
    pub messages: Vec<Message>,
    pub bundles: Vec<Bundle>,
    source: Option<SocketAddr>,
}

impl Bundle {
    pub fn new(timetag: Timetag) -> Self {
        Self {
            timetag,
            messages: Vec::new(),
            bundles: Vec::new(),
            source: None,
        }
    }

    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn push_bundle(&mut self, bundle: Bundle) {
        self.bundles.push(bundle);
    }

    pub fn source(&self) -> Option<SocketAddr> {
        self.source
    }

    pub fn set_source(&mut self, source: SocketAddr) {
        self.source = Some(source);
    }

    /// Encodes the bundle: padded `#bundle` tag, the 8-byte time tag,
    /// then every child (messages first, then nested bundles) prefixed
    /// with its own 4-byte big-endian length.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        write_padded_string(&mut out, BUNDLE_TAG);
        out.extend_from_slice(&self.timetag.to_be_bytes());
        for message in &self.messages {
            write_element(&mut out, &message.encode());
        }
        for bundle in &self.bundles {
            write_element(&mut out, &bundle.encode());
        }
        out
    }

    pub(crate) fn decode(reader: &mut Reader<'_>, depth: usize) -> Result<Self, DecodeError> {
        if depth >= MAX_BUNDLE_DEPTH {
            return Err(DecodeError::BundleTooDeep { depth });
        }

        let tag = reader.read_padded_string()?;
        if tag != BUNDLE_TAG {
            return Err(DecodeError::InvalidBundleTag { found: tag });
        }
        let timetag = Timetag::from_raw(reader.read_u64("bundle time tag")?);

        let mut bundle = Bundle::new(timetag);
        while !reader.is_empty() {
            let declared = reader.read_u32("bundle element length")? as usize;
            // rejects lengths past the end of the datagram
            let mut element = reader.take(declared)?;
            match Packet::decode_nested(&mut element, depth + 1)? {
                Packet::Message(message) => bundle.messages.push(message),
                Packet::Bundle(child) => bundle.bundles.push(child),
            }
        }
        Ok(bundle)
    }
}

fn write_element(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
    out.extend_from_slice(bytes);
}
