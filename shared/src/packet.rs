use std::net::SocketAddr;

use crate::bundle::Bundle;
use crate::codec::Reader;
use crate::error::DecodeError;
use crate::message::Message;

/// Upper bound on a received OSC datagram: the UDP payload ceiling.
pub const MAX_PACKET_SIZE: usize = 65_535;

/// Maximum bundle nesting depth accepted by the decoder. The recursion
/// is already bounded by the remaining-length invariant; the explicit
/// guard rejects adversarial deeply-nested input early.
pub const MAX_BUNDLE_DEPTH: usize = 32;

/// One decoded top-level unit: either a message or a bundle, plus the
/// transport source address attached after decode.
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    Message(Message),
    Bundle(Bundle),
}

impl Packet {
    /// Decodes one packet from a received datagram; `bytes` must cover
    /// exactly the received length. The first byte decides the shape:
    /// `/` starts a message, `#` starts a bundle. Anything else is not
    /// OSC traffic and yields `Ok(None)` rather than an error, so a
    /// server can silently ignore foreign datagrams on a shared port.
    pub fn decode(bytes: &[u8]) -> Result<Option<Packet>, DecodeError> {
        let mut reader = Reader::new(bytes);
        match reader.peek_u8() {
            Some(b'/') => Ok(Some(Packet::Message(Message::decode(&mut reader)?))),
            Some(b'#') => Ok(Some(Packet::Bundle(Bundle::decode(&mut reader, 0)?))),
            _ => Ok(None),
        }
    }

    /// Nested decode used for bundle elements, where the permissive
    /// top-level behavior does not apply: inside a bundle, an element
    /// must be a message or a bundle.
    pub(crate) fn decode_nested(
        reader: &mut Reader<'_>,
        depth: usize,
    ) -> Result<Packet, DecodeError> {
        match reader.peek_u8() {
            Some(b'/') => Ok(Packet::Message(Message::decode(reader)?)),
            Some(b'#') => Ok(Packet::Bundle(Bundle::decode(reader, depth)?)),
            Some(leading) => Err(DecodeError::UnsupportedPacket { leading }),
            None => Err(DecodeError::TruncatedInput { element: "packet" }),
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        match self {
            Packet::Message(message) => message.encode(),
            Packet::Bundle(bundle) => bundle.encode(),
        }
    }

    /// The transport address this packet arrived from.
    pub fn source(&self) -> Option<SocketAddr> {
        match self {
            Packet::Message(message) => message.source(),
            Packet::Bundle(bundle) => bundle.source(),
        }
    }

    pub fn set_source(&mut self, source: SocketAddr) {
        match self {
            Packet::Message(message) => message.set_source(source),
            Packet::Bundle(bundle) => bundle.set_source(source),
        }
    }
}

impl From<Message> for Packet {
    fn from(message: Message) -> Self {
        Packet::Message(message)
    }
}

impl From<Bundle> for Packet {
    fn from(bundle: Bundle) -> Self {
        Packet::Bundle(bundle)
    }
}
