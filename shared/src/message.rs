use std::fmt;
use std::net::SocketAddr;

use crate::argument::Argument;
use crate::codec::{write_blob, write_padded_string, Reader};
use crate::error::DecodeError;
use crate::timetag::Timetag;

/// A single OSC message: an address beginning with `/` followed by zero
/// or more typed arguments, in order.
///
/// Equality is structural and includes the transport source address;
/// use [`Message::eq_ignoring_source`] to compare payloads only.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub address: String,
    pub args: Vec<Argument>,
    source: Option<SocketAddr>,
}

impl Message {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            args: Vec::new(),
            source: None,
        }
    }

    /// Appends one argument.
    pub fn push(&mut self, arg: impl Into<Argument>) {
        self.args.push(arg.into());
    }

    /// Appends every argument in order.
    pub fn push_all(&mut self, args: impl IntoIterator<Item = Argument>) {
        self.args.extend(args);
    }

    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// Removes all arguments, keeping the address.
    pub fn clear_args(&mut self) {
        self.args.clear();
    }

    /// Removes the address and all arguments.
    pub fn clear(&mut self) {
        self.address.clear();
        self.clear_args();
    }

    /// The transport address this message arrived from, if it was
    /// decoded from a received datagram.
    pub fn source(&self) -> Option<SocketAddr> {
        self.source
    }

    pub fn set_source(&mut self, source: SocketAddr) {
        self.source = Some(source);
    }

    /// Structural equality over address and arguments, ignoring the
    /// transport source.
    pub fn eq_ignoring_source(&self, other: &Message) -> bool {
        self.address == other.address && self.args == other.args
    }

    /// The type tag string: `,` followed by one tag character per
    /// argument, in argument order.
    pub fn type_tags(&self) -> String {
        let mut tags = String::with_capacity(self.args.len() + 1);
        tags.push(',');
        for arg in &self.args {
            tags.push(arg.type_tag());
        }
        tags
    }

    /// Encodes the message: padded address, padded type tag string,
    /// then each argument payload in order. Infallible; the closed
    /// [`Argument`] set leaves nothing unencodable.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        write_padded_string(&mut out, &self.address);
        write_padded_string(&mut out, &self.type_tags());
        for arg in &self.args {
            match arg {
                // T, F and N live entirely in the type tag string
                Argument::Nil | Argument::Bool(_) => {}
                Argument::Int32(v) => out.extend_from_slice(&v.to_be_bytes()),
                Argument::Int64(v) => out.extend_from_slice(&v.to_be_bytes()),
                Argument::Float32(v) => out.extend_from_slice(&v.to_be_bytes()),
                Argument::Float64(v) => out.extend_from_slice(&v.to_be_bytes()),
                Argument::String(s) => write_padded_string(&mut out, s),
                Argument::Blob(data) => write_blob(&mut out, data),
                Argument::Timetag(t) => out.extend_from_slice(&t.to_be_bytes()),
            }
        }
        out
    }

    pub(crate) fn decode(reader: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let address = reader.read_padded_string()?;
        let mut message = Message::new(address);

        let tags = reader.read_padded_string()?;
        let mut chars = tags.chars();
        if chars.next() != Some(',') {
            return Err(DecodeError::InvalidTypeTagString);
        }

        for tag in chars {
            let arg = match tag {
                'i' => Argument::Int32(reader.read_i32("int32 argument")?),
                'h' => Argument::Int64(reader.read_i64("int64 argument")?),
                'f' => Argument::Float32(reader.read_f32("float32 argument")?),
                'd' => Argument::Float64(reader.read_f64("float64 argument")?),
                's' => Argument::String(reader.read_padded_string()?),
                'b' => Argument::Blob(reader.read_blob()?),
                't' => Argument::Timetag(Timetag::from_raw(
                    reader.read_u64("time tag argument")?,
                )),
                'T' => Argument::Bool(true),
                'F' => Argument::Bool(false),
                'N' => Argument::Nil,
                other => return Err(DecodeError::UnsupportedTypeTag { tag: other }),
            };
            message.args.push(arg);
        }

        Ok(message)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.address, self.type_tags())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
